use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::core::AppConfig;

pub mod init;
pub mod serve;

#[derive(Subcommand)]
enum Command {
    /// Create the database schema
    Init {},
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long)]
        host: Option<String>,

        /// Set the server port
        #[arg(long)]
        port: Option<String>,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    // A missing .env file is fine, the environment may already be set
    dotenvy::dotenv().ok();
    let config = AppConfig::default();

    // Handle each sub command
    match args.command {
        Some(Command::Init {}) => {
            init::run(&config.database_url).await?;
        }
        Some(Command::Serve { host, port }) => {
            serve::run(host, port, config).await?;
        }
        None => {}
    }

    Ok(())
}
