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

use crate::infrastructure::constants::METRICS_HTTP_TIMEOUT;
use crate::shared::error::EmrError;
use reqwest::Client;
use std::process::Command;
use tracing::debug;

/// An external command to hand the terminal over to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecRequest {
    pub args: Vec<String>,
    /// Extra variables set in the child's environment only
    pub envs: Vec<(String, String)>,
}

impl ExecRequest {
    pub fn new(args: Vec<String>) -> Self {
        Self {
            args,
            envs: Vec::new(),
        }
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// The command line as typed in a shell, for `--debug`
    pub fn command_line(&self) -> String {
        self.args.join(" ")
    }
}

/// Side effects outside the provisioning API
#[async_trait::async_trait]
pub trait OperationHandler: Send + Sync {
    /// GET a URL with a short timeout and return the body
    async fn http_get(&self, url: &str) -> Result<Vec<u8>, EmrError>;

    /// Run a command in place of the current process.
    ///
    /// On Unix this only returns when the exec itself fails.
    fn exec(&self, request: &ExecRequest) -> Result<(), EmrError>;
}

pub struct SystemOperations {
    http: Client,
}

impl SystemOperations {
    pub fn new() -> Result<Self, EmrError> {
        let http = Client::builder().timeout(METRICS_HTTP_TIMEOUT).build()?;
        Ok(Self { http })
    }
}

#[async_trait::async_trait]
impl OperationHandler for SystemOperations {
    async fn http_get(&self, url: &str) -> Result<Vec<u8>, EmrError> {
        debug!(url, "GET");
        let response = self.http.get(url).send().await?;
        let body = response.bytes().await?;
        Ok(body.to_vec())
    }

    fn exec(&self, request: &ExecRequest) -> Result<(), EmrError> {
        let (program, args) = request
            .args
            .split_first()
            .ok_or_else(|| EmrError::argument("no command to execute"))?;

        let mut command = Command::new(program);
        command.args(args);
        for (key, value) in &request.envs {
            command.env(key, value);
        }
        debug!(command = %request.command_line(), "exec");

        replace_process(command, program)
    }
}

#[cfg(unix)]
fn replace_process(mut command: Command, program: &str) -> Result<(), EmrError> {
    use std::os::unix::process::CommandExt;

    let err = command.exec();
    Err(EmrError::exec(program, err))
}

#[cfg(not(unix))]
fn replace_process(mut command: Command, program: &str) -> Result<(), EmrError> {
    let status = command
        .status()
        .map_err(|e| EmrError::exec(program, e))?;
    std::process::exit(status.code().unwrap_or(1));
}
