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

use crate::domain::cluster::state::{LiveCluster, LiveInstanceGroup, StateFilter};
use crate::infrastructure::emr::EmrApi;
use crate::shared::error::{EmrError, Result};
use std::sync::Arc;
use tracing::debug;

/// Name and address lookups against the provisioning service
#[derive(Clone)]
pub struct ClusterDirectory {
    api: Arc<dyn EmrApi>,
}

impl ClusterDirectory {
    pub fn new(api: Arc<dyn EmrApi>) -> Self {
        Self { api }
    }

    /// First cluster whose name matches exactly, paging only as far as needed
    pub async fn resolve_by_name(&self, name: &str, filter: StateFilter) -> Result<LiveCluster> {
        let mut marker = None;
        loop {
            let page = self.api.list_clusters(filter.states(), marker).await?;
            if let Some(cluster) = page.items.into_iter().find(|c| c.name == name) {
                debug!(name, id = %cluster.id, "resolved cluster");
                return Ok(cluster);
            }
            match page.marker {
                Some(next) => marker = Some(next),
                None => return Err(EmrError::not_found("cluster", name)),
            }
        }
    }

    pub async fn master_address(&self, cluster_id: &str) -> Result<Option<String>> {
        let master = self.api.describe_master(cluster_id).await?;
        Ok(master.filter(|address| !address.is_empty()))
    }

    /// Master address, failing while the master has none
    pub async fn resolve_master(&self, cluster_id: &str) -> Result<String> {
        self.master_address(cluster_id)
            .await?
            .ok_or_else(|| EmrError::MasterNotReady(cluster_id.to_string()))
    }

    pub async fn list_instance_groups(&self, cluster_id: &str) -> Result<Vec<LiveInstanceGroup>> {
        let mut groups = Vec::new();
        let mut marker = None;
        loop {
            let page = self.api.list_instance_groups(cluster_id, marker).await?;
            groups.extend(page.items);
            match page.marker {
                Some(next) => marker = Some(next),
                None => return Ok(groups),
            }
        }
    }

    /// Groups ordered master, core, task, then the rest
    pub async fn sorted_instance_groups(&self, cluster_id: &str) -> Result<Vec<LiveInstanceGroup>> {
        let mut groups = self.list_instance_groups(cluster_id).await?;
        groups.sort_by_key(|group| group.group_type.rank());
        Ok(groups)
    }
}
