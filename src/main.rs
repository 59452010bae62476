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

use clap::Parser;
use emrcmd::cli::{commands::Commands, CliArgs};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    match args.command {
        Commands::Start(cmd) => cmd.execute().await,
        Commands::List(cmd) => cmd.execute().await,
        Commands::Resize(cmd) => cmd.execute().await,
        Commands::Terminate(cmd) => cmd.execute().await,
        Commands::Ssh(cmd) => cmd.execute().await,
        Commands::Scp(cmd) => cmd.execute().await,
        Commands::Shell(cmd) => cmd.execute().await,
        Commands::Init(cmd) => cmd.execute().await,
    }
}
