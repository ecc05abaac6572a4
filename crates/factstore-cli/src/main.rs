use std::path::PathBuf;

use clap::{Parser, Subcommand};
use factstore::FactStore;
use factstore::config::Config;
use factstore_cli::commands::{ConfigCommand, MemoryCommand};
use factstore_cli::error::CliResult;
use factstore_cli::output::OutputFormat;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "factstore-cli")]
#[command(about = "factstore CLI - inspect and edit per-session fact memory")]
#[command(version)]
pub struct Cli {
    #[clap(long, short, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[clap(long, short = 'd', global = true, help = "Path to data directory")]
    pub data_dir: Option<PathBuf>,

    #[clap(long, short = 'c', global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Memory commands")]
    Memory(MemoryCommand),

    #[clap(about = "Configuration commands")]
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> CliResult<()> {
    init_logging();

    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir.clone() {
        tracing::debug!(data_dir = %data_dir.display(), "Overriding data directory");
        config.storage.data_dir = data_dir;
    }

    match &cli.command {
        Command::Config(cmd) => cmd.execute(cli.config.as_deref(), &config, format),
        Command::Memory(cmd) => {
            let store = FactStore::from_config(&config).await?;
            tracing::debug!(
                backend = ?config.storage.backend,
                data_dir = %config.storage.data_dir.display(),
                "Fact store ready"
            );
            cmd.execute(&store, format).await
        }
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,factstore=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
