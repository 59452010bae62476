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

use crate::domain::cluster::directory::ClusterDirectory;
use crate::domain::cluster::metrics::ClusterMetrics;
use crate::domain::cluster::reconciler::{self, ResizeAction};
use crate::domain::cluster::report::{plain_state, ClusterReport, StateStyle};
use crate::domain::cluster::state::{LiveCluster, StateFilter};
use crate::domain::config::ConfigRenderer;
use crate::infrastructure::constants::{
    metrics_url, DEFAULT_LIST_LIMIT, ENV_MASTER, MASTER_LOGIN_USER, SCP_MASTER_PLACEHOLDER,
    SCP_PROGRAM, SSH_PROGRAM,
};
use crate::infrastructure::emr::{EmrApi, EmrApiImpl};
use crate::infrastructure::operations::{ExecRequest, OperationHandler, SystemOperations};
use crate::shared::error::Result;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct StartOptions {
    pub name: String,
    pub vars: BTreeMap<String, String>,
    pub filename: PathBuf,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct ListOptions {
    pub all: bool,
    pub no_master: bool,
    pub no_metrics: bool,
    pub no_size: bool,
    pub limit: usize,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            all: false,
            no_master: false,
            no_metrics: false,
            no_size: false,
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

impl ListOptions {
    fn has_details(&self) -> bool {
        !self.no_master || !self.no_metrics || !self.no_size
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResizeOptions {
    pub name: String,
    pub group: String,
    pub size: i32,
    pub vars: BTreeMap<String, String>,
    pub filename: PathBuf,
    pub dry_run: bool,
}

/// Options shared by `ssh` and `scp`
#[derive(Debug, Clone, Default)]
pub struct RemoteOptions {
    pub name: String,
    pub args: Vec<String>,
    pub identity_file: Option<String>,
    /// `-o` options; an empty value is passed as a bare key
    pub options: BTreeMap<String, String>,
    pub debug: bool,
}

impl RemoteOptions {
    fn command_prefix(&self, program: &str) -> Vec<String> {
        let mut args = vec![program.to_string()];
        if let Some(identity) = self.identity_file.as_deref().filter(|f| !f.is_empty()) {
            args.push("-i".to_string());
            args.push(identity.to_string());
        }
        for (key, value) in &self.options {
            args.push("-o".to_string());
            if value.is_empty() {
                args.push(key.clone());
            } else {
                args.push(format!("{}={}", key, value));
            }
        }
        args
    }
}

/// Cluster lifecycle and remote access operations
pub struct EmrClusterManager {
    api: Arc<dyn EmrApi>,
    directory: ClusterDirectory,
    ops: Arc<dyn OperationHandler>,
    renderer: ConfigRenderer,
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
    state_style: StateStyle,
}

impl EmrClusterManager {
    pub fn new(api: Arc<dyn EmrApi>, ops: Arc<dyn OperationHandler>) -> Self {
        Self {
            directory: ClusterDirectory::new(api.clone()),
            api,
            ops,
            renderer: ConfigRenderer::new(),
            out: Box::new(std::io::stdout()),
            err: Box::new(std::io::stderr()),
            state_style: plain_state,
        }
    }

    /// Manager backed by the AWS SDK and the local system
    pub async fn from_env() -> Result<Self> {
        let api = EmrApiImpl::new().await;
        let ops = SystemOperations::new()?;
        Ok(Self::new(Arc::new(api), Arc::new(ops)))
    }

    pub fn with_output(mut self, out: Box<dyn Write + Send>, err: Box<dyn Write + Send>) -> Self {
        self.out = out;
        self.err = err;
        self
    }

    pub fn with_renderer(mut self, renderer: ConfigRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_state_style(mut self, style: StateStyle) -> Self {
        self.state_style = style;
        self
    }

    pub fn directory(&self) -> &ClusterDirectory {
        &self.directory
    }

    pub async fn start(&mut self, opts: &StartOptions) -> Result<()> {
        let spec = self.renderer.load(&opts.filename, &opts.name, &opts.vars)?;
        let spec = reconciler::groups_for_start(spec);

        if opts.dry_run {
            writeln!(self.err, "Start cluster with:")?;
            write!(self.out, "{}", spec.to_yaml()?)?;
            return Ok(());
        }

        writeln!(self.err, "starting cluster {} ...", opts.name)?;
        let cluster_id = self.api.run_job_flow(&spec).await?;
        info!(name = %opts.name, id = %cluster_id, "cluster creation requested");

        self.api.wait_until_running(&cluster_id).await?;
        writeln!(self.err, "cluster {} ({}) is running", opts.name, cluster_id)?;
        Ok(())
    }

    pub async fn list(&mut self, opts: &ListOptions) -> Result<()> {
        let filter = if opts.all {
            StateFilter::All
        } else {
            StateFilter::Active
        };

        if opts.limit == 0 {
            return Ok(());
        }

        let mut printed = 0;
        let mut marker = None;
        loop {
            let page = self.api.list_clusters(filter.states(), marker).await?;
            for cluster in page.items {
                let report = self.report(cluster, opts).await?;
                self.out
                    .write_all(report.render(self.state_style).as_bytes())?;
                printed += 1;
                if printed >= opts.limit {
                    return Ok(());
                }
            }
            match page.marker {
                Some(next) => marker = Some(next),
                None => return Ok(()),
            }
        }
    }

    async fn report(&self, cluster: LiveCluster, opts: &ListOptions) -> Result<ClusterReport> {
        let mut report = ClusterReport::new(cluster);
        report.separator = opts.has_details();

        let master = if !opts.no_master || !opts.no_metrics {
            self.directory.master_address(&report.cluster.id).await?
        } else {
            None
        };
        if !opts.no_master {
            report.master = Some(master.clone());
        }

        if !opts.no_metrics && report.cluster.state.serves_metrics() {
            if let Some(master) = &master {
                report.metrics = Some(self.fetch_metrics(master).await?);
            }
        }

        if !opts.no_size {
            report.instance_groups = Some(
                self.directory
                    .sorted_instance_groups(&report.cluster.id)
                    .await?,
            );
        }

        Ok(report)
    }

    async fn fetch_metrics(&self, master: &str) -> Result<ClusterMetrics> {
        let url = metrics_url(master);
        debug!(url = %url, "fetching cluster metrics");
        let body = self.ops.http_get(&url).await?;
        ClusterMetrics::from_json(&body)
    }

    pub async fn resize(&mut self, opts: &ResizeOptions) -> Result<()> {
        let spec = self.renderer.load(&opts.filename, &opts.name, &opts.vars)?;
        let group = reconciler::group_for_resize(&spec, &opts.group, opts.size)?;

        if opts.dry_run {
            writeln!(self.err, "Resize cluster with:")?;
            write!(self.out, "{}", group.to_yaml()?)?;
            return Ok(());
        }

        let cluster = self
            .directory
            .resolve_by_name(&opts.name, StateFilter::Active)
            .await?;
        let live_groups = self.directory.list_instance_groups(&cluster.id).await?;

        match reconciler::plan_resize(&cluster.id, group, &live_groups) {
            ResizeAction::AddGroup { cluster_id, group } => {
                info!(cluster = %cluster_id, group = %group.name, "adding instance group");
                self.api.add_instance_group(&cluster_id, &group).await?;
            }
            ResizeAction::ModifyCount {
                cluster_id,
                instance_group_id,
                count,
            } => {
                info!(cluster = %cluster_id, group = %instance_group_id, count, "modifying instance group");
                self.api
                    .modify_instance_group(&cluster_id, &instance_group_id, count)
                    .await?;
            }
        }

        writeln!(self.err, "resizing {} to {}...", opts.group, opts.size)?;
        Ok(())
    }

    pub async fn terminate(&mut self, name: &str) -> Result<()> {
        let cluster = self
            .directory
            .resolve_by_name(name, StateFilter::Active)
            .await?;
        writeln!(self.err, "terminating cluster {} ({})...", name, cluster.id)?;
        self.api.terminate_job_flow(&cluster.id).await
    }

    pub async fn ssh(&mut self, opts: &RemoteOptions) -> Result<()> {
        let master = self.master_of(&opts.name).await?;

        let mut args = opts.command_prefix(SSH_PROGRAM);
        args.push(master);
        args.extend(opts.args.iter().cloned());

        self.exec(ExecRequest::new(args), opts.debug)
    }

    pub async fn scp(&mut self, opts: &RemoteOptions) -> Result<()> {
        let master = self.master_of(&opts.name).await?;
        let remote = format!("{}@{}:", MASTER_LOGIN_USER, master);

        let mut args = opts.command_prefix(SCP_PROGRAM);
        args.extend(
            opts.args
                .iter()
                .map(|arg| arg.replace(SCP_MASTER_PLACEHOLDER, &remote)),
        );

        self.exec(ExecRequest::new(args), opts.debug)
    }

    /// Print an `export` line for the master, or run `args` with it in the environment
    pub async fn shell(&mut self, name: &str, args: &[String]) -> Result<()> {
        let master = self.master_of(name).await?;

        if args.is_empty() {
            writeln!(self.out, "export {}={}", ENV_MASTER, master)?;
            return Ok(());
        }

        let request = ExecRequest::new(args.to_vec()).with_env(ENV_MASTER, master);
        self.exec(request, false)
    }

    async fn master_of(&self, name: &str) -> Result<String> {
        let cluster = self
            .directory
            .resolve_by_name(name, StateFilter::Active)
            .await?;
        self.directory.resolve_master(&cluster.id).await
    }

    fn exec(&mut self, request: ExecRequest, debug: bool) -> Result<()> {
        if debug {
            writeln!(self.err, "{}", request.command_line())?;
        }
        self.err.flush()?;
        self.out.flush()?;
        self.ops.exec(&request)
    }
}
