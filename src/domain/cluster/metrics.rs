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

use crate::shared::error::Result;
use serde::Deserialize;

/// YARN resource manager cluster metrics
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterMetrics {
    pub containers_allocated: i64,
    pub containers_pending: i64,
    #[serde(rename = "allocatedMB")]
    pub allocated_mb: i64,
    #[serde(rename = "totalMB")]
    pub total_mb: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetricsResponse {
    cluster_metrics: ClusterMetrics,
}

impl ClusterMetrics {
    pub fn from_json(body: &[u8]) -> Result<Self> {
        let response: MetricsResponse = serde_json::from_slice(body)?;
        Ok(response.cluster_metrics)
    }

    /// Allocated memory as a rounded percentage of the total; 0 when the
    /// resource manager reports no capacity.
    pub fn memory_used_percent(&self) -> i64 {
        if self.total_mb <= 0 {
            return 0;
        }
        (self.allocated_mb as f64 / self.total_mb as f64 * 100.0).round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_percent() {
        let body = br#"{
            "clusterMetrics": {
                "containersAllocated": 100,
                "containersPending": 80,
                "allocatedMB": 6000,
                "totalMB": 10000,
                "appsRunning": 3
            }
        }"#;
        let metrics = ClusterMetrics::from_json(body).unwrap();
        assert_eq!(metrics.containers_allocated, 100);
        assert_eq!(metrics.containers_pending, 80);
        assert_eq!(metrics.memory_used_percent(), 60);
    }

    #[test]
    fn test_percent_rounds() {
        let metrics = ClusterMetrics {
            allocated_mb: 2,
            total_mb: 3,
            ..Default::default()
        };
        assert_eq!(metrics.memory_used_percent(), 67);
    }

    #[test]
    fn test_zero_total_is_zero_percent() {
        let metrics = ClusterMetrics {
            allocated_mb: 512,
            total_mb: 0,
            ..Default::default()
        };
        assert_eq!(metrics.memory_used_percent(), 0);
    }

    #[test]
    fn test_malformed_body() {
        assert!(ClusterMetrics::from_json(b"<html>502</html>").is_err());
    }
}
