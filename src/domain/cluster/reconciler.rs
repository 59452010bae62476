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

use crate::domain::cluster::state::LiveInstanceGroup;
use crate::domain::config::spec::{ClusterSpec, InstanceGroupSpec};
use crate::shared::error::{EmrError, Result};

/// What a resize does to the live cluster
#[derive(Debug, Clone, PartialEq)]
pub enum ResizeAction {
    /// No group of that name exists yet
    AddGroup {
        cluster_id: String,
        group: InstanceGroupSpec,
    },
    /// Change the requested count of an existing group
    ModifyCount {
        cluster_id: String,
        instance_group_id: String,
        count: i32,
    },
}

/// Drop instance groups with a non-positive count before creation.
///
/// The provisioning service rejects zero-sized groups, so templates can keep
/// e.g. a task group at `lookup("task", 0)` and only get it when asked for.
pub fn groups_for_start(mut spec: ClusterSpec) -> ClusterSpec {
    spec.instances
        .instance_groups
        .retain(|group| group.instance_count > 0);
    spec
}

/// Pick the named group from the rendered spec and set its count to `size`
pub fn group_for_resize(
    spec: &ClusterSpec,
    group_name: &str,
    size: i32,
) -> Result<InstanceGroupSpec> {
    let mut group = spec
        .instance_group(group_name)
        .cloned()
        .ok_or_else(|| EmrError::not_found("instance group (in configuration)", group_name))?;
    group.instance_count = size;
    Ok(group)
}

/// Decide between adding the group and modifying the live group of the same name
pub fn plan_resize(
    cluster_id: &str,
    group: InstanceGroupSpec,
    live_groups: &[LiveInstanceGroup],
) -> ResizeAction {
    match live_groups.iter().find(|live| live.name == group.name) {
        Some(live) => ResizeAction::ModifyCount {
            cluster_id: cluster_id.to_string(),
            instance_group_id: live.id.clone(),
            count: group.instance_count,
        },
        None => ResizeAction::AddGroup {
            cluster_id: cluster_id.to_string(),
            group,
        },
    }
}
