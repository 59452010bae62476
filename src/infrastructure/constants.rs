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

use std::path::PathBuf;
use std::time::Duration;

/// Environment variables
pub const ENV_CLUSTER_CONFIG_FILE: &str = "EMR_CLUSTER_CONFIG_FILE";
pub const ENV_SSH_IDENTITY_FILE: &str = "EMR_SSH_IDENTITY_FILE";
pub const ENV_SSH_OPTIONS: &str = "EMR_SSH_OPTIONS";
pub const ENV_MASTER: &str = "EMR_MASTER";
pub const ENV_VAR_PREFIX: &str = "EMR_VAR_";

/// Cluster configuration template
pub const DEFAULT_CONFIG_FILE_NAME: &str = ".emrcmd-cluster.yml";
pub const TEMPLATE_NAME_VAR: &str = "name";

/// Remote access
pub const SSH_PROGRAM: &str = "ssh";
pub const SCP_PROGRAM: &str = "scp";
pub const SCP_MASTER_PLACEHOLDER: &str = "@:";
pub const MASTER_LOGIN_USER: &str = "hadoop";
pub const DEFAULT_SSH_OPTIONS: [&str; 3] = [
    "ServerAliveInterval=10",
    "StrictHostKeyChecking=no",
    "UserKnownHostsFile=/dev/null",
];

/// Shell helper
pub const DEFAULT_COMMAND_NAME: &str = "emrcmd";

/// Resource manager metrics
pub const RESOURCE_MANAGER_PORT: u16 = 8088;
pub const RESOURCE_MANAGER_METRICS_PATH: &str = "/ws/v1/cluster/metrics";
pub const METRICS_HTTP_TIMEOUT: Duration = Duration::from_secs(1);

/// Listing
pub const DEFAULT_LIST_LIMIT: usize = 10;

/// Upper bound for the cluster-running waiter
pub const CLUSTER_RUNNING_MAX_WAIT: Duration = Duration::from_secs(30 * 60);

pub fn default_config_path() -> PathBuf {
    let home = std::env::var_os("HOME").unwrap_or_default();
    PathBuf::from(home).join(DEFAULT_CONFIG_FILE_NAME)
}

pub fn metrics_url(master: &str) -> String {
    format!(
        "http://{}:{}{}",
        master, RESOURCE_MANAGER_PORT, RESOURCE_MANAGER_METRICS_PATH
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_url() {
        assert_eq!(
            metrics_url("master-public-dns-name"),
            "http://master-public-dns-name:8088/ws/v1/cluster/metrics"
        );
    }

    #[test]
    fn test_default_config_path_file_name() {
        let path = default_config_path();
        assert!(path.ends_with(DEFAULT_CONFIG_FILE_NAME));
    }
}
