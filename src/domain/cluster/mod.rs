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

pub mod directory;
pub mod manager;
pub mod metrics;
pub mod reconciler;
pub mod report;
pub mod state;

pub use self::directory::ClusterDirectory;
pub use self::manager::{
    EmrClusterManager, ListOptions, RemoteOptions, ResizeOptions, StartOptions,
};
pub use self::metrics::ClusterMetrics;
pub use self::reconciler::ResizeAction;
pub use self::report::{ClusterReport, StateStyle};
pub use self::state::{
    ClusterState, InstanceGroupType, LiveCluster, LiveInstanceGroup, Page, StateFilter,
};
