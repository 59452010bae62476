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

use thiserror::Error;
pub type Result<T> = std::result::Result<T, EmrError>;

#[derive(Error, Debug)]
pub enum EmrError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{resource_type} '{name}' is not found")]
    NotFound { resource_type: String, name: String },

    #[error("{0}")]
    RemoteError(String),

    #[error("Argument error: {0}")]
    ArgumentError(String),

    #[error("Master node of cluster '{0}' has no public address yet")]
    MasterNotReady(String),

    #[error("Failed to execute {program}: {source}")]
    ExecError {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl From<reqwest::Error> for EmrError {
    fn from(err: reqwest::Error) -> Self {
        EmrError::RemoteError(err.to_string())
    }
}

impl EmrError {
    pub fn config_error(context: impl Into<String>) -> Self {
        Self::ConfigError(context.into())
    }

    pub fn not_found(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }

    pub fn remote(context: impl Into<String>) -> Self {
        Self::RemoteError(context.into())
    }

    pub fn argument(context: impl Into<String>) -> Self {
        Self::ArgumentError(context.into())
    }

    pub fn exec(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::ExecError {
            program: program.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = EmrError::not_found("cluster", "test");
        assert_eq!(err.to_string(), "cluster 'test' is not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_remote_message_is_verbatim() {
        let err = EmrError::remote("ValidationException: bad instance type");
        assert_eq!(err.to_string(), "ValidationException: bad instance type");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_exec_error_keeps_io_source() {
        use std::error::Error as _;

        let err = EmrError::exec(
            "ssh",
            std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
        );
        assert_eq!(
            err.to_string(),
            "Failed to execute ssh: No such file or directory"
        );
        assert!(err.source().is_some());
        assert!(!matches!(err, EmrError::ArgumentError(_)));
    }
}
