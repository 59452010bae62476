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

use std::fmt;
use std::str::FromStr;

/// Cluster lifecycle state as reported by the provisioning service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterState {
    Starting,
    Bootstrapping,
    Running,
    Waiting,
    Terminating,
    Terminated,
    TerminatedWithErrors,
    Unknown(String),
}

/// States before termination
pub static ACTIVE_STATES: [ClusterState; 4] = [
    ClusterState::Starting,
    ClusterState::Bootstrapping,
    ClusterState::Running,
    ClusterState::Waiting,
];

pub static ALL_STATES: [ClusterState; 7] = [
    ClusterState::Starting,
    ClusterState::Bootstrapping,
    ClusterState::Running,
    ClusterState::Waiting,
    ClusterState::Terminating,
    ClusterState::Terminated,
    ClusterState::TerminatedWithErrors,
];

impl ClusterState {
    pub fn as_str(&self) -> &str {
        match self {
            ClusterState::Starting => "STARTING",
            ClusterState::Bootstrapping => "BOOTSTRAPPING",
            ClusterState::Running => "RUNNING",
            ClusterState::Waiting => "WAITING",
            ClusterState::Terminating => "TERMINATING",
            ClusterState::Terminated => "TERMINATED",
            ClusterState::TerminatedWithErrors => "TERMINATED_WITH_ERRORS",
            ClusterState::Unknown(state) => state.as_str(),
        }
    }

    pub fn is_active(&self) -> bool {
        ACTIVE_STATES.contains(self)
    }

    /// Whether the resource manager on the master can be queried
    pub fn serves_metrics(&self) -> bool {
        matches!(self, ClusterState::Running | ClusterState::Waiting)
    }
}

impl FromStr for ClusterState {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "STARTING" => ClusterState::Starting,
            "BOOTSTRAPPING" => ClusterState::Bootstrapping,
            "RUNNING" => ClusterState::Running,
            "WAITING" => ClusterState::Waiting,
            "TERMINATING" => ClusterState::Terminating,
            "TERMINATED" => ClusterState::Terminated,
            "TERMINATED_WITH_ERRORS" => ClusterState::TerminatedWithErrors,
            other => ClusterState::Unknown(other.to_string()),
        })
    }
}

impl fmt::Display for ClusterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which part of the lifecycle a cluster listing covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateFilter {
    #[default]
    Active,
    All,
}

impl StateFilter {
    pub fn states(&self) -> &'static [ClusterState] {
        match self {
            StateFilter::Active => &ACTIVE_STATES,
            StateFilter::All => &ALL_STATES,
        }
    }
}

/// Instance group role type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceGroupType {
    Master,
    Core,
    Task,
    Other(String),
}

impl InstanceGroupType {
    /// Display rank: master, core, task, then anything else
    pub fn rank(&self) -> u8 {
        match self {
            InstanceGroupType::Master => 0,
            InstanceGroupType::Core => 1,
            InstanceGroupType::Task => 2,
            InstanceGroupType::Other(_) => 9,
        }
    }
}

impl FromStr for InstanceGroupType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "MASTER" => InstanceGroupType::Master,
            "CORE" => InstanceGroupType::Core,
            "TASK" => InstanceGroupType::Task,
            other => InstanceGroupType::Other(other.to_string()),
        })
    }
}

/// Cluster summary from a listing call
#[derive(Debug, Clone, PartialEq)]
pub struct LiveCluster {
    pub id: String,
    pub name: String,
    pub state: ClusterState,
    pub normalized_instance_hours: i32,
}

/// Instance group as currently provisioned
#[derive(Debug, Clone, PartialEq)]
pub struct LiveInstanceGroup {
    pub id: String,
    pub name: String,
    pub group_type: InstanceGroupType,
    pub requested_count: i32,
    pub running_count: i32,
}

/// One page of a paginated listing; `marker` is `None` on the last page
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub marker: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_partition() {
        for state in ALL_STATES.iter() {
            let terminal = matches!(
                state,
                ClusterState::Terminating
                    | ClusterState::Terminated
                    | ClusterState::TerminatedWithErrors
            );
            assert_eq!(state.is_active(), !terminal, "{}", state);
        }
        assert_eq!(StateFilter::Active.states().len(), 4);
        assert_eq!(StateFilter::All.states().len(), 7);
    }

    #[test]
    fn test_state_round_trip_names() {
        let state: ClusterState = "TERMINATED_WITH_ERRORS".parse().unwrap();
        assert_eq!(state, ClusterState::TerminatedWithErrors);
        let state: ClusterState = "SUSPENDED".parse().unwrap();
        assert_eq!(state.as_str(), "SUSPENDED");
        assert!(!state.is_active());
    }

    #[test]
    fn test_serves_metrics() {
        assert!(ClusterState::Waiting.serves_metrics());
        assert!(ClusterState::Running.serves_metrics());
        assert!(!ClusterState::Bootstrapping.serves_metrics());
    }

    #[test]
    fn test_group_rank() {
        let ranks: Vec<u8> = ["MASTER", "CORE", "TASK", "SPARE"]
            .iter()
            .map(|s| s.parse::<InstanceGroupType>().unwrap().rank())
            .collect();
        assert_eq!(ranks, vec![0, 1, 2, 9]);
    }
}
