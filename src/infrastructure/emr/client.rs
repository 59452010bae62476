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

use crate::domain::cluster::state::{
    ClusterState, InstanceGroupType, LiveCluster, LiveInstanceGroup, Page,
};
use crate::domain::config::spec::{
    BootstrapActionSpec, ClusterSpec, ConfigurationSpec, InstanceGroupSpec,
};
use crate::infrastructure::constants::CLUSTER_RUNNING_MAX_WAIT;
use crate::shared::error::EmrError;
use aws_sdk_emr::client::Waiters;
use aws_sdk_emr::error::DisplayErrorContext;
use aws_sdk_emr::types::{
    Application, BootstrapActionConfig, Configuration, InstanceGroupConfig,
    InstanceGroupModifyConfig, InstanceRoleType, JobFlowInstancesConfig, MarketType,
    ScriptBootstrapActionConfig, Tag,
};
use aws_sdk_emr::Client;
use tracing::{debug, info};

/// Operations the tool needs from the provisioning service
#[async_trait::async_trait]
pub trait EmrApi: Send + Sync {
    /// Create a cluster and return its id
    async fn run_job_flow(&self, spec: &ClusterSpec) -> Result<String, EmrError>;

    /// Block until the cluster reaches RUNNING or WAITING
    async fn wait_until_running(&self, cluster_id: &str) -> Result<(), EmrError>;

    async fn list_clusters(
        &self,
        states: &[ClusterState],
        marker: Option<String>,
    ) -> Result<Page<LiveCluster>, EmrError>;

    /// Public DNS name of the master node, if assigned
    async fn describe_master(&self, cluster_id: &str) -> Result<Option<String>, EmrError>;

    async fn list_instance_groups(
        &self,
        cluster_id: &str,
        marker: Option<String>,
    ) -> Result<Page<LiveInstanceGroup>, EmrError>;

    async fn add_instance_group(
        &self,
        cluster_id: &str,
        group: &InstanceGroupSpec,
    ) -> Result<(), EmrError>;

    async fn modify_instance_group(
        &self,
        cluster_id: &str,
        instance_group_id: &str,
        count: i32,
    ) -> Result<(), EmrError>;

    async fn terminate_job_flow(&self, cluster_id: &str) -> Result<(), EmrError>;
}

pub struct EmrApiImpl {
    client: Client,
}

impl EmrApiImpl {
    /// Client from the standard AWS configuration chain (env, profile, IMDS)
    pub async fn new() -> Self {
        let config = aws_config::load_from_env().await;
        Self {
            client: Client::new(&config),
        }
    }
}

fn remote_error<E>(err: E) -> EmrError
where
    E: std::error::Error,
{
    EmrError::remote(DisplayErrorContext(err).to_string())
}

fn to_instance_group_config(group: &InstanceGroupSpec) -> InstanceGroupConfig {
    InstanceGroupConfig::builder()
        .name(&group.name)
        .instance_role(InstanceRoleType::from(group.instance_role.as_str()))
        .instance_type(&group.instance_type)
        .instance_count(group.instance_count)
        .set_market(group.market.as_deref().map(MarketType::from))
        .set_bid_price(group.bid_price.clone())
        .build()
}

fn to_bootstrap_action(action: &BootstrapActionSpec) -> BootstrapActionConfig {
    let script = ScriptBootstrapActionConfig::builder()
        .path(&action.script_bootstrap_action.path)
        .set_args(non_empty(action.script_bootstrap_action.args.clone()))
        .build();
    BootstrapActionConfig::builder()
        .name(&action.name)
        .script_bootstrap_action(script)
        .build()
}

fn to_configuration(conf: &ConfigurationSpec) -> Configuration {
    let nested: Vec<Configuration> = conf.configurations.iter().map(to_configuration).collect();

    Configuration::builder()
        .classification(&conf.classification)
        .set_properties(if conf.properties.is_empty() {
            None
        } else {
            Some(conf.properties.clone().into_iter().collect())
        })
        .set_configurations(if nested.is_empty() { None } else { Some(nested) })
        .build()
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

#[async_trait::async_trait]
impl EmrApi for EmrApiImpl {
    async fn run_job_flow(&self, spec: &ClusterSpec) -> Result<String, EmrError> {
        let instances = &spec.instances;
        let groups = instances
            .instance_groups
            .iter()
            .map(to_instance_group_config)
            .collect();

        let instances_config = JobFlowInstancesConfig::builder()
            .set_instance_groups(non_empty(groups))
            .set_ec2_key_name(instances.ec2_key_name.clone())
            .set_ec2_subnet_id(instances.ec2_subnet_id.clone())
            .set_emr_managed_master_security_group(
                instances.emr_managed_master_security_group.clone(),
            )
            .set_emr_managed_slave_security_group(
                instances.emr_managed_slave_security_group.clone(),
            )
            .set_service_access_security_group(instances.service_access_security_group.clone())
            .set_additional_master_security_groups(non_empty(
                instances.additional_master_security_groups.clone(),
            ))
            .set_additional_slave_security_groups(non_empty(
                instances.additional_slave_security_groups.clone(),
            ))
            .set_keep_job_flow_alive_when_no_steps(instances.keep_job_flow_alive_when_no_steps)
            .set_termination_protected(instances.termination_protected)
            .build();

        let applications = spec
            .applications
            .iter()
            .map(|app| {
                Application::builder()
                    .name(&app.name)
                    .set_version(app.version.clone())
                    .build()
            })
            .collect();

        let bootstrap_actions = spec
            .bootstrap_actions
            .iter()
            .map(to_bootstrap_action)
            .collect();

        let tags = spec
            .tags
            .iter()
            .map(|tag| Tag::builder().key(&tag.key).value(&tag.value).build())
            .collect();

        debug!(name = %spec.name, "RunJobFlow");
        let output = self
            .client
            .run_job_flow()
            .name(&spec.name)
            .set_release_label(spec.release_label.clone())
            .set_custom_ami_id(spec.custom_ami_id.clone())
            .set_log_uri(spec.log_uri.clone())
            .set_service_role(spec.service_role.clone())
            .set_job_flow_role(spec.job_flow_role.clone())
            .set_auto_scaling_role(spec.auto_scaling_role.clone())
            .set_visible_to_all_users(spec.visible_to_all_users)
            .set_step_concurrency_level(spec.step_concurrency_level)
            .set_applications(non_empty(applications))
            .set_configurations(non_empty(
                spec.configurations.iter().map(to_configuration).collect(),
            ))
            .set_bootstrap_actions(non_empty(bootstrap_actions))
            .set_tags(non_empty(tags))
            .instances(instances_config)
            .send()
            .await
            .map_err(remote_error)?;

        output
            .job_flow_id()
            .map(str::to_string)
            .ok_or_else(|| EmrError::remote("RunJobFlow returned no cluster id"))
    }

    async fn wait_until_running(&self, cluster_id: &str) -> Result<(), EmrError> {
        info!(cluster_id, "waiting for cluster to be running");
        self.client
            .wait_until_cluster_running()
            .cluster_id(cluster_id)
            .wait(CLUSTER_RUNNING_MAX_WAIT)
            .await
            .map_err(remote_error)?;
        Ok(())
    }

    async fn list_clusters(
        &self,
        states: &[ClusterState],
        marker: Option<String>,
    ) -> Result<Page<LiveCluster>, EmrError> {
        debug!(?marker, "ListClusters");
        let output = self
            .client
            .list_clusters()
            .set_cluster_states(Some(
                states
                    .iter()
                    .map(|s| aws_sdk_emr::types::ClusterState::from(s.as_str()))
                    .collect(),
            ))
            .set_marker(marker)
            .send()
            .await
            .map_err(remote_error)?;

        let items = output
            .clusters()
            .iter()
            .map(|summary| LiveCluster {
                id: summary.id().unwrap_or_default().to_string(),
                name: summary.name().unwrap_or_default().to_string(),
                state: summary
                    .status()
                    .and_then(|status| status.state())
                    .map(|state| {
                        state
                            .as_str()
                            .parse()
                            .unwrap_or(ClusterState::Unknown(String::new()))
                    })
                    .unwrap_or(ClusterState::Unknown(String::new())),
                normalized_instance_hours: summary.normalized_instance_hours().unwrap_or(0),
            })
            .collect();

        Ok(Page {
            items,
            marker: output.marker().map(str::to_string),
        })
    }

    async fn describe_master(&self, cluster_id: &str) -> Result<Option<String>, EmrError> {
        debug!(cluster_id, "DescribeCluster");
        let output = self
            .client
            .describe_cluster()
            .cluster_id(cluster_id)
            .send()
            .await
            .map_err(remote_error)?;

        Ok(output
            .cluster()
            .and_then(|cluster| cluster.master_public_dns_name())
            .filter(|name| !name.is_empty())
            .map(str::to_string))
    }

    async fn list_instance_groups(
        &self,
        cluster_id: &str,
        marker: Option<String>,
    ) -> Result<Page<LiveInstanceGroup>, EmrError> {
        debug!(cluster_id, ?marker, "ListInstanceGroups");
        let output = self
            .client
            .list_instance_groups()
            .cluster_id(cluster_id)
            .set_marker(marker)
            .send()
            .await
            .map_err(remote_error)?;

        let items = output
            .instance_groups()
            .iter()
            .map(|group| LiveInstanceGroup {
                id: group.id().unwrap_or_default().to_string(),
                name: group.name().unwrap_or_default().to_string(),
                group_type: group
                    .instance_group_type()
                    .map(|t| {
                        t.as_str()
                            .parse()
                            .unwrap_or(InstanceGroupType::Other(String::new()))
                    })
                    .unwrap_or(InstanceGroupType::Other(String::new())),
                requested_count: group.requested_instance_count().unwrap_or(0),
                running_count: group.running_instance_count().unwrap_or(0),
            })
            .collect();

        Ok(Page {
            items,
            marker: output.marker().map(str::to_string),
        })
    }

    async fn add_instance_group(
        &self,
        cluster_id: &str,
        group: &InstanceGroupSpec,
    ) -> Result<(), EmrError> {
        debug!(cluster_id, group = %group.name, "AddInstanceGroups");
        self.client
            .add_instance_groups()
            .job_flow_id(cluster_id)
            .instance_groups(to_instance_group_config(group))
            .send()
            .await
            .map_err(remote_error)?;
        Ok(())
    }

    async fn modify_instance_group(
        &self,
        cluster_id: &str,
        instance_group_id: &str,
        count: i32,
    ) -> Result<(), EmrError> {
        debug!(cluster_id, instance_group_id, count, "ModifyInstanceGroups");
        let modify = InstanceGroupModifyConfig::builder()
            .instance_group_id(instance_group_id)
            .instance_count(count)
            .build();

        self.client
            .modify_instance_groups()
            .cluster_id(cluster_id)
            .instance_groups(modify)
            .send()
            .await
            .map_err(remote_error)?;
        Ok(())
    }

    async fn terminate_job_flow(&self, cluster_id: &str) -> Result<(), EmrError> {
        debug!(cluster_id, "TerminateJobFlows");
        self.client
            .terminate_job_flows()
            .job_flow_ids(cluster_id)
            .send()
            .await
            .map_err(remote_error)?;
        Ok(())
    }
}
