// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![allow(dead_code)]

use emrcmd::domain::cluster::{
    ClusterState, InstanceGroupType, LiveCluster, LiveInstanceGroup, Page,
};
use emrcmd::{
    ClusterSpec, ConfigRenderer, EmrApi, EmrClusterManager, EmrError, ExecRequest,
    InstanceGroupSpec, OperationHandler,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub const MASTER: &str = "master-public-dns-name";

pub const METRICS_BODY: &str = r#"{
  "clusterMetrics": {
    "appsSubmitted": 12,
    "containersAllocated": 100,
    "containersPending": 80,
    "allocatedMB": 6000,
    "totalMB": 10000
  }
}"#;

pub fn sample_config() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/cluster-sample.yml")
}

pub fn cluster(id: &str, name: &str, state: ClusterState) -> LiveCluster {
    LiveCluster {
        id: id.to_string(),
        name: name.to_string(),
        state,
        normalized_instance_hours: 10,
    }
}

pub fn group(
    id: &str,
    name: &str,
    group_type: InstanceGroupType,
    requested: i32,
    running: i32,
) -> LiveInstanceGroup {
    LiveInstanceGroup {
        id: id.to_string(),
        name: name.to_string(),
        group_type,
        requested_count: requested,
        running_count: running,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    RunJobFlow(ClusterSpec),
    WaitUntilRunning(String),
    ListClusters {
        states: Vec<ClusterState>,
        marker: Option<String>,
    },
    DescribeMaster(String),
    ListInstanceGroups {
        cluster_id: String,
        marker: Option<String>,
    },
    AddInstanceGroup {
        cluster_id: String,
        group: InstanceGroupSpec,
    },
    ModifyInstanceGroup {
        cluster_id: String,
        instance_group_id: String,
        count: i32,
    },
    TerminateJobFlow(String),
}

/// Provisioning API fake serving canned pages and recording every call
pub struct RecordingEmrApi {
    pub cluster_pages: Vec<Vec<LiveCluster>>,
    pub group_pages: Vec<Vec<LiveInstanceGroup>>,
    pub master: Option<String>,
    pub new_cluster_id: String,
    calls: Mutex<Vec<ApiCall>>,
}

impl Default for RecordingEmrApi {
    /// One WAITING cluster `test` with a master and a partially running core group
    fn default() -> Self {
        Self {
            cluster_pages: vec![vec![cluster("j-00000000", "test", ClusterState::Waiting)]],
            group_pages: vec![vec![
                group("ig-00000002", "core", InstanceGroupType::Core, 5, 2),
                group("ig-00000001", "master", InstanceGroupType::Master, 1, 1),
            ]],
            master: Some(MASTER.to_string()),
            new_cluster_id: "j-11111111".to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl RecordingEmrApi {
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that change remote state
    pub fn mutations(&self) -> Vec<ApiCall> {
        self.calls()
            .into_iter()
            .filter(|call| {
                matches!(
                    call,
                    ApiCall::RunJobFlow(_)
                        | ApiCall::AddInstanceGroup { .. }
                        | ApiCall::ModifyInstanceGroup { .. }
                        | ApiCall::TerminateJobFlow(_)
                )
            })
            .collect()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }
}

fn page_of<T: Clone>(pages: &[Vec<T>], marker: Option<&str>) -> Page<T> {
    let index: usize = marker.and_then(|m| m.parse().ok()).unwrap_or(0);
    let items = pages.get(index).cloned().unwrap_or_default();
    let next = index + 1;
    Page {
        items,
        marker: (next < pages.len()).then(|| next.to_string()),
    }
}

#[async_trait::async_trait]
impl EmrApi for RecordingEmrApi {
    async fn run_job_flow(&self, spec: &ClusterSpec) -> Result<String, EmrError> {
        self.record(ApiCall::RunJobFlow(spec.clone()));
        Ok(self.new_cluster_id.clone())
    }

    async fn wait_until_running(&self, cluster_id: &str) -> Result<(), EmrError> {
        self.record(ApiCall::WaitUntilRunning(cluster_id.to_string()));
        Ok(())
    }

    async fn list_clusters(
        &self,
        states: &[ClusterState],
        marker: Option<String>,
    ) -> Result<Page<LiveCluster>, EmrError> {
        self.record(ApiCall::ListClusters {
            states: states.to_vec(),
            marker: marker.clone(),
        });
        let page = page_of(&self.cluster_pages, marker.as_deref());
        Ok(Page {
            items: page
                .items
                .into_iter()
                .filter(|c| states.contains(&c.state))
                .collect(),
            marker: page.marker,
        })
    }

    async fn describe_master(&self, cluster_id: &str) -> Result<Option<String>, EmrError> {
        self.record(ApiCall::DescribeMaster(cluster_id.to_string()));
        Ok(self.master.clone())
    }

    async fn list_instance_groups(
        &self,
        cluster_id: &str,
        marker: Option<String>,
    ) -> Result<Page<LiveInstanceGroup>, EmrError> {
        self.record(ApiCall::ListInstanceGroups {
            cluster_id: cluster_id.to_string(),
            marker: marker.clone(),
        });
        Ok(page_of(&self.group_pages, marker.as_deref()))
    }

    async fn add_instance_group(
        &self,
        cluster_id: &str,
        group: &InstanceGroupSpec,
    ) -> Result<(), EmrError> {
        self.record(ApiCall::AddInstanceGroup {
            cluster_id: cluster_id.to_string(),
            group: group.clone(),
        });
        Ok(())
    }

    async fn modify_instance_group(
        &self,
        cluster_id: &str,
        instance_group_id: &str,
        count: i32,
    ) -> Result<(), EmrError> {
        self.record(ApiCall::ModifyInstanceGroup {
            cluster_id: cluster_id.to_string(),
            instance_group_id: instance_group_id.to_string(),
            count,
        });
        Ok(())
    }

    async fn terminate_job_flow(&self, cluster_id: &str) -> Result<(), EmrError> {
        self.record(ApiCall::TerminateJobFlow(cluster_id.to_string()));
        Ok(())
    }
}

/// Operation handler fake: canned metrics body, recorded URLs and exec requests
pub struct RecordingOperations {
    pub metrics_body: Option<String>,
    urls: Mutex<Vec<String>>,
    execs: Mutex<Vec<ExecRequest>>,
}

impl Default for RecordingOperations {
    fn default() -> Self {
        Self {
            metrics_body: Some(METRICS_BODY.to_string()),
            urls: Mutex::new(Vec::new()),
            execs: Mutex::new(Vec::new()),
        }
    }
}

impl RecordingOperations {
    /// Every metrics request fails with a timeout
    pub fn failing() -> Self {
        Self {
            metrics_body: None,
            ..Self::default()
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }

    pub fn execs(&self) -> Vec<ExecRequest> {
        self.execs.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl OperationHandler for RecordingOperations {
    async fn http_get(&self, url: &str) -> Result<Vec<u8>, EmrError> {
        self.urls.lock().unwrap().push(url.to_string());
        self.metrics_body
            .clone()
            .map(String::into_bytes)
            .ok_or_else(|| EmrError::remote("operation timed out"))
    }

    fn exec(&self, request: &ExecRequest) -> Result<(), EmrError> {
        self.execs.lock().unwrap().push(request.clone());
        Ok(())
    }
}

/// Cloneable in-memory writer
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Manager wired to the fakes with captured stdout/stderr
pub struct Harness {
    pub api: Arc<RecordingEmrApi>,
    pub ops: Arc<RecordingOperations>,
    pub out: SharedBuffer,
    pub err: SharedBuffer,
}

impl Harness {
    pub fn new(api: RecordingEmrApi, ops: RecordingOperations) -> Self {
        Self {
            api: Arc::new(api),
            ops: Arc::new(ops),
            out: SharedBuffer::default(),
            err: SharedBuffer::default(),
        }
    }

    pub fn manager(&self) -> EmrClusterManager {
        EmrClusterManager::new(self.api.clone(), self.ops.clone())
            .with_output(Box::new(self.out.clone()), Box::new(self.err.clone()))
            .with_renderer(ConfigRenderer::with_env_lookup(|_| None))
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new(RecordingEmrApi::default(), RecordingOperations::default())
    }
}
