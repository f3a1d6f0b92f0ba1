// ABOUTME: Command-line entry point for the Usertags server
// ABOUTME: Flags override values loaded from the environment and .env

use clap::Parser;
use std::path::PathBuf;
use std::process;
use usertags_cli::config::{parse_host, parse_port, Config, SetStoreKind};

#[derive(Parser)]
#[command(name = "usertags")]
#[command(about = "Usertags - tag users and find them by tag")]
#[command(version)]
struct Cli {
    /// API server port
    #[arg(long)]
    port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// SQLite database file
    #[arg(long)]
    db_path: Option<PathBuf>,

    #[arg(long, help = "Keep tag sets in memory instead of SQLite")]
    memory_store: bool,
}

impl Cli {
    fn apply(self, mut config: Config) -> anyhow::Result<Config> {
        if let Some(port) = self.port {
            config.port = parse_port(&port.to_string())?;
        }
        if let Some(host) = self.host {
            config.host = parse_host(&host)?;
        }
        if let Some(db_path) = self.db_path {
            config.db_path = db_path;
        }
        if self.memory_store {
            config.set_store = SetStoreKind::Memory;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    usertags_cli::logging::init_tracing();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.apply(Config::from_env()?)?;
    usertags_cli::run_server(config).await
}
