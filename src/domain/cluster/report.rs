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

//! Text block printed for each cluster by `list`

use crate::domain::cluster::metrics::ClusterMetrics;
use crate::domain::cluster::state::{ClusterState, LiveCluster, LiveInstanceGroup};
use std::fmt::Write;

/// How the state column is drawn
pub type StateStyle = fn(&ClusterState) -> String;

pub fn plain_state(state: &ClusterState) -> String {
    state.to_string()
}

/// Everything gathered about one cluster. `None` sections were not requested.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterReport {
    pub cluster: LiveCluster,
    /// `Some(None)` when requested but the master has no address yet
    pub master: Option<Option<String>>,
    pub metrics: Option<ClusterMetrics>,
    pub instance_groups: Option<Vec<LiveInstanceGroup>>,
    pub separator: bool,
}

impl ClusterReport {
    pub fn new(cluster: LiveCluster) -> Self {
        Self {
            cluster,
            master: None,
            metrics: None,
            instance_groups: None,
            separator: false,
        }
    }

    pub fn render(&self, style: StateStyle) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "{}  {}  {}  {}",
            self.cluster.name,
            style(&self.cluster.state),
            self.cluster.id,
            self.cluster.normalized_instance_hours
        );

        if let Some(master) = &self.master {
            let _ = writeln!(
                out,
                "  Master: {}",
                master.as_deref().unwrap_or("(pending)")
            );
        }

        if let Some(metrics) = &self.metrics {
            let _ = writeln!(
                out,
                "  MemoryUsed:  {}%  |  ContainersRunning: {}  |  ContainersPending: {}",
                metrics.memory_used_percent(),
                metrics.containers_allocated,
                metrics.containers_pending
            );
        }

        if let Some(groups) = &self.instance_groups {
            out.push_str("  Nodes:\n");
            for group in groups {
                if group.running_count == group.requested_count {
                    let _ = writeln!(out, "    {}: {}", group.name, group.running_count);
                } else {
                    let _ = writeln!(
                        out,
                        "    {}: {}({})",
                        group.name, group.running_count, group.requested_count
                    );
                }
            }
        }

        if self.separator {
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cluster::state::InstanceGroupType;

    fn cluster() -> LiveCluster {
        LiveCluster {
            id: "j-00000000".to_string(),
            name: "test".to_string(),
            state: ClusterState::Waiting,
            normalized_instance_hours: 10,
        }
    }

    #[test]
    fn test_header_only() {
        let report = ClusterReport::new(cluster());
        assert_eq!(report.render(plain_state), "test  WAITING  j-00000000  10\n");
    }

    #[test]
    fn test_full_report() {
        let report = ClusterReport {
            cluster: cluster(),
            master: Some(Some("master-public-dns-name".to_string())),
            metrics: Some(ClusterMetrics {
                containers_allocated: 100,
                containers_pending: 80,
                allocated_mb: 6000,
                total_mb: 10000,
            }),
            instance_groups: Some(vec![
                LiveInstanceGroup {
                    id: "ig-00000001".to_string(),
                    name: "master".to_string(),
                    group_type: InstanceGroupType::Master,
                    requested_count: 1,
                    running_count: 1,
                },
                LiveInstanceGroup {
                    id: "ig-00000002".to_string(),
                    name: "core".to_string(),
                    group_type: InstanceGroupType::Core,
                    requested_count: 5,
                    running_count: 2,
                },
            ]),
            separator: true,
        };
        let expected = "test  WAITING  j-00000000  10
  Master: master-public-dns-name
  MemoryUsed:  60%  |  ContainersRunning: 100  |  ContainersPending: 80
  Nodes:
    master: 1
    core: 2(5)

";
        assert_eq!(report.render(plain_state), expected);
    }

    #[test]
    fn test_pending_master() {
        let mut report = ClusterReport::new(cluster());
        report.master = Some(None);
        assert!(report.render(plain_state).contains("  Master: (pending)\n"));
    }

    #[test]
    fn test_custom_state_style() {
        fn lower(state: &ClusterState) -> String {
            state.as_str().to_lowercase()
        }
        let report = ClusterReport::new(cluster());
        assert!(report.render(lower).starts_with("test  waiting  "));
    }
}
