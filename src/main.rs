mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::{ManageCommand, QueryCommand};
use podprobe::LogLevel;
use podprobe::infra::config::{default_config_dir, load_app_config};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "podprobe",
    version,
    about = "Query podman for container, image and version state"
)]
struct Cli {
    /// Configuration directory (default: ~/.config/podprobe)
    #[arg(
        long,
        global = true,
        env = "PODPROBE_CONFIG_DIR",
        default_value_os_t = default_config_dir()
    )]
    config_dir: PathBuf,

    /// Log level passed to podman, overrides the config file
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Query(QueryCommand),
    #[command(flatten)]
    Manage(ManageCommand),
    /// Write a default podprobe.toml into the config directory
    Init,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    if let Commands::Init = args.command {
        return cli::setup::install(&args.config_dir).map(|_| ExitCode::SUCCESS);
    }

    let mut config = load_app_config(&args.config_dir)?;
    if args.log_level.is_some() {
        config.podman.log_level = args.log_level;
    }
    let adapter = config.build_adapter()?;

    match args.command {
        Commands::Query(cmd) => cli::query::run(cmd, &adapter),
        Commands::Manage(cmd) => cli::manage::run(cmd, &adapter),
        Commands::Init => Ok(ExitCode::SUCCESS),
    }
}
