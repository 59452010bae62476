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

//! Cluster specification parsed from a rendered template.
//!
//! Keys follow the provisioning service's cluster-creation request and are
//! written in PascalCase, e.g.
//!
//! ```yaml
//! Name: analytics
//! ReleaseLabel: emr-6.15.0
//! Instances:
//!   InstanceGroups:
//!     - Name: master
//!       InstanceRole: MASTER
//!       InstanceType: m5.xlarge
//!       InstanceCount: 1
//! ```

use crate::shared::error::{EmrError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ClusterSpec {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_ami_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_flow_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_scaling_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_to_all_users: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_concurrency_level: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub applications: Vec<ApplicationSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub configurations: Vec<ConfigurationSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bootstrap_actions: Vec<BootstrapActionSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagSpec>,
    pub instances: InstancesSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct InstancesSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ec2_key_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ec2_subnet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emr_managed_master_security_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emr_managed_slave_security_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_access_security_group: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional_master_security_groups: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional_slave_security_groups: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_job_flow_alive_when_no_steps: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_protected: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub instance_groups: Vec<InstanceGroupSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct InstanceGroupSpec {
    pub name: String,
    pub instance_role: String,
    pub instance_type: String,
    #[serde(deserialize_with = "deserialize_instance_count")]
    pub instance_count: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_bid_price"
    )]
    pub bid_price: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ApplicationSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ConfigurationSpec {
    pub classification: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub configurations: Vec<ConfigurationSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BootstrapActionSpec {
    pub name: String,
    pub script_bootstrap_action: ScriptBootstrapActionSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ScriptBootstrapActionSpec {
    pub path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TagSpec {
    pub key: String,
    pub value: String,
}

impl ClusterSpec {
    pub fn from_yaml(content: &str) -> Result<Self> {
        let spec: ClusterSpec = serde_yaml::from_str(content)?;
        Ok(spec)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(EmrError::from)
    }

    pub fn instance_group(&self, name: &str) -> Option<&InstanceGroupSpec> {
        self.instances
            .instance_groups
            .iter()
            .find(|group| group.name == name)
    }
}

impl InstanceGroupSpec {
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(EmrError::from)
    }
}

/// An empty `InstanceCount:` (e.g. a bare-key variable) counts as 0
fn deserialize_instance_count<'de, D>(deserializer: D) -> std::result::Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i32>::deserialize(deserializer)?.unwrap_or(0))
}

/// Bid prices are strings on the wire, but templates tend to write `0.5`.
fn deserialize_bid_price<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Price {
        Text(String),
        Number(f64),
    }

    Ok(match Option::<Price>::deserialize(deserializer)? {
        Some(Price::Text(text)) => Some(text),
        Some(Price::Number(number)) => Some(number.to_string()),
        None => None,
    })
}
