mod cli;
mod config;
mod devices;
mod http;
mod serve;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve => serve::run(cli.effective_config()).await,
        Commands::Init => cli::init::run(&cli.config),
        Commands::Config(cmd) => cli::config_cmd::run(cmd.clone(), &cli.config),
        Commands::Sessions => cli::sessions::run(&cli),
        Commands::Ask(args) => cli::ask::run(args.clone(), &cli),
        Commands::Stats => cli::stats::run(&cli),
        Commands::Backup(args) => cli::backup::run(args.clone(), &cli),
    }
}
