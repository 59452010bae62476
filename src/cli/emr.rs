//! Cluster commands

use crate::cli::display::colors::paint_state;
use crate::domain::cluster::{
    EmrClusterManager, ListOptions, RemoteOptions, ResizeOptions, StartOptions,
};
use crate::domain::config::parse_variables;
use crate::infrastructure::constants::{
    default_config_path, DEFAULT_COMMAND_NAME, DEFAULT_LIST_LIMIT, DEFAULT_SSH_OPTIONS,
    ENV_CLUSTER_CONFIG_FILE, ENV_SSH_IDENTITY_FILE, ENV_SSH_OPTIONS,
};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

async fn connect() -> anyhow::Result<EmrClusterManager> {
    let manager = EmrClusterManager::from_env().await?;
    if std::io::stdout().is_terminal() {
        Ok(manager.with_state_style(paint_state))
    } else {
        Ok(manager)
    }
}

fn config_file(filename: &Option<PathBuf>) -> PathBuf {
    filename.clone().unwrap_or_else(default_config_path)
}

#[derive(Parser, Debug, Clone)]
pub struct StartCommand {
    /// Cluster configuration template [default: $HOME/.emrcmd-cluster.yml]
    #[arg(long, short = 'f', env = ENV_CLUSTER_CONFIG_FILE, value_name = "PATH")]
    pub filename: Option<PathBuf>,

    /// Print the rendered configuration instead of starting the cluster
    #[arg(long, short = 'n')]
    pub dryrun: bool,

    /// Cluster name
    pub name: String,

    /// Template variables
    #[arg(value_name = "KEY=VAL")]
    pub vars: Vec<String>,
}

impl StartCommand {
    pub fn options(&self) -> StartOptions {
        StartOptions {
            name: self.name.clone(),
            vars: parse_variables(&self.vars),
            filename: config_file(&self.filename),
            dry_run: self.dryrun,
        }
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        let mut manager = connect().await?;
        manager.start(&self.options()).await?;
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// Include terminating and terminated clusters
    #[arg(long, short = 'a')]
    pub all: bool,

    /// Same as --no-master --no-metrics --no-size
    #[arg(long, short = 's')]
    pub simple: bool,

    /// Do not show the master address
    #[arg(long, short = 'U')]
    pub no_master: bool,

    /// Do not query the resource manager metrics
    #[arg(long, short = 'M')]
    pub no_metrics: bool,

    /// Do not show instance group sizes
    #[arg(long, short = 'S')]
    pub no_size: bool,

    /// Maximum number of clusters to show
    #[arg(long, short = 'n', default_value_t = DEFAULT_LIST_LIMIT)]
    pub limit: usize,
}

impl ListCommand {
    pub fn options(&self) -> ListOptions {
        ListOptions {
            all: self.all,
            no_master: self.simple || self.no_master,
            no_metrics: self.simple || self.no_metrics,
            no_size: self.simple || self.no_size,
            limit: self.limit,
        }
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        let mut manager = connect().await?;
        manager.list(&self.options()).await?;
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct ResizeCommand {
    /// Cluster configuration template [default: $HOME/.emrcmd-cluster.yml]
    #[arg(long, short = 'f', env = ENV_CLUSTER_CONFIG_FILE, value_name = "PATH")]
    pub filename: Option<PathBuf>,

    /// Print the instance group configuration instead of resizing
    #[arg(long, short = 'n')]
    pub dryrun: bool,

    /// Cluster name
    pub name: String,

    /// Instance group name as written in the configuration
    pub instance_group: String,

    /// New instance count
    #[arg(value_parser = clap::value_parser!(i32).range(0..))]
    pub size: i32,

    /// Template variables
    #[arg(value_name = "KEY=VAL")]
    pub vars: Vec<String>,
}

impl ResizeCommand {
    pub fn options(&self) -> ResizeOptions {
        ResizeOptions {
            name: self.name.clone(),
            group: self.instance_group.clone(),
            size: self.size,
            vars: parse_variables(&self.vars),
            filename: config_file(&self.filename),
            dry_run: self.dryrun,
        }
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        let mut manager = connect().await?;
        manager.resize(&self.options()).await?;
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct TerminateCommand {
    /// Cluster name
    pub name: String,
}

impl TerminateCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let mut manager = connect().await?;
        manager.terminate(&self.name).await?;
        Ok(())
    }
}

/// Flags shared by ssh and scp
#[derive(clap::Args, Debug, Clone)]
pub struct SshFlags {
    /// Identity file
    #[arg(short = 'i', env = ENV_SSH_IDENTITY_FILE, value_name = "FILE")]
    pub identity_file: Option<String>,

    /// SSH options in KEY=VAL format, added to the defaults
    /// [env: EMR_SSH_OPTIONS, comma-separated, used when no -o is given]
    #[arg(short = 'o', value_name = "KEY=VAL")]
    pub options: Vec<String>,

    /// Print the command line before running it
    #[arg(long, short = 'd')]
    pub debug: bool,
}

impl SshFlags {
    /// `-o` values as given, else the comma-separated `EMR_SSH_OPTIONS`
    fn user_options(&self, env_options: Option<String>) -> Vec<String> {
        if !self.options.is_empty() {
            return self.options.clone();
        }
        env_options
            .map(|value| {
                value
                    .split(',')
                    .filter(|option| !option.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn remote_options(&self, name: &str, args: &[String]) -> RemoteOptions {
        self.remote_options_with_env(name, args, std::env::var(ENV_SSH_OPTIONS).ok())
    }

    fn remote_options_with_env(
        &self,
        name: &str,
        args: &[String],
        env_options: Option<String>,
    ) -> RemoteOptions {
        let user_options = self.user_options(env_options);
        let options: Vec<&str> = DEFAULT_SSH_OPTIONS
            .iter()
            .copied()
            .chain(user_options.iter().map(String::as_str))
            .collect();
        RemoteOptions {
            name: name.to_string(),
            args: args.to_vec(),
            identity_file: self.identity_file.clone(),
            options: parse_variables(&options),
            debug: self.debug,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct SshCommand {
    #[command(flatten)]
    pub flags: SshFlags,

    /// Cluster name
    pub name: String,

    /// Extra ssh arguments, e.g. a remote command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl SshCommand {
    pub fn remote_options(&self) -> RemoteOptions {
        self.flags.remote_options(&self.name, &self.args)
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        let mut manager = connect().await?;
        manager.ssh(&self.remote_options()).await?;
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct ScpCommand {
    #[command(flatten)]
    pub flags: SshFlags,

    /// Cluster name
    pub name: String,

    /// SOURCES... DEST
    #[arg(
        required = true,
        num_args = 2..,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "PATH"
    )]
    pub args: Vec<String>,
}

impl ScpCommand {
    pub fn remote_options(&self) -> RemoteOptions {
        self.flags.remote_options(&self.name, &self.args)
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        let mut manager = connect().await?;
        manager.scp(&self.remote_options()).await?;
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct ShellCommand {
    /// Cluster name
    pub name: String,

    /// Command to run with EMR_MASTER set
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "CMD")]
    pub command: Vec<String>,
}

impl ShellCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let mut manager = connect().await?;
        manager.shell(&self.name, &self.command).await?;
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct InitCommand {
    /// Name of the shell function to define
    #[arg(value_name = "COMMAND_NAME")]
    pub command_name: Option<String>,
}

impl InitCommand {
    /// Shell function that evals `shell NAME` output so EMR_MASTER lands in
    /// the calling shell
    pub fn script(&self) -> String {
        let name = self.command_name.as_deref().unwrap_or(DEFAULT_COMMAND_NAME);
        format!(
            r#"{name}() {{
  local command
  command="$1"
  if [ "$#" -gt 0 ]; then
    shift
  fi

  case "$command" in
  shell)
    if [ "$#" -eq 1 ]; then
      eval "$(command {bin} shell "$@")"
    else
      command {bin} shell "$@"
    fi
    ;;
  *)
    command {bin} "$command" "$@";;
  esac
}}
"#,
            name = name,
            bin = DEFAULT_COMMAND_NAME
        )
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        println!("{}", self.script());
        Ok(())
    }
}
