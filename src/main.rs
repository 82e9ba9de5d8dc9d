use clap::{Parser, Subcommand};
use std::path::PathBuf;

use shorts_automator::config::{load_config_file, ConfigOverrides, ServerConfig};
use shorts_automator::serve::serve_api;

#[derive(Parser, Debug)]
#[command(author, version, about = "Content idea generator API for short-form video creators")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API
    Serve {
        /// Path to config file (TOML format)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Address to bind (default: 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (default: 8000)
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Document database URL (sqlite:... or postgres://...)
        #[arg(long, env = "DATABASE_URL")]
        database_url: Option<String>,

        /// Database name on the server
        #[arg(long, env = "DATABASE_NAME")]
        database_name: Option<String>,

        /// Connection pool size (default: 5)
        #[arg(long)]
        max_connections: Option<u32>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match args.command {
        Command::Serve {
            config,
            host,
            port,
            database_url,
            database_name,
            max_connections,
        } => {
            let file = match config {
                Some(path) => Some(load_config_file(&path)?),
                None => None,
            };
            let overrides = ConfigOverrides {
                host,
                port,
                database_url,
                database_name,
                max_connections,
            };
            let config = ServerConfig::resolve(file, overrides)?;
            serve_api(config)
        }
    }
}
