// CLI command definitions

use super::emr::{
    InitCommand, ListCommand, ResizeCommand, ScpCommand, ShellCommand, SshCommand, StartCommand,
    TerminateCommand,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "emrcmd",
    version,
    about = "Start, resize and reach EMR clusters from a cluster template",
    long_about = "A small CLI for EMR clusters: renders a templated cluster configuration, \
                  manages cluster lifecycle and proxies ssh/scp/shell access to the master node"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Start a new cluster from the configuration template
    #[command(alias = "up")]
    Start(StartCommand),

    /// List clusters
    #[command(alias = "ls")]
    List(ListCommand),

    /// Resize an instance group, adding it when the cluster lacks it
    Resize(ResizeCommand),

    /// Terminate a cluster
    #[command(aliases = ["rm", "down"])]
    Terminate(TerminateCommand),

    /// Ssh to the master node
    Ssh(SshCommand),

    /// Copy files from/to the master node (`@:` stands for the master)
    Scp(ScpCommand),

    /// Print `export EMR_MASTER=...`, or run a command with EMR_MASTER set
    Shell(ShellCommand),

    /// Print the shell helper function
    Init(InitCommand),
}
