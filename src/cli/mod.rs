use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::bot;
use crate::core::AppConfig;

#[derive(Subcommand)]
enum Command {
    /// Run the bot: Telegram long polling plus the liveness endpoint
    Run {
        /// Listen address for the liveness endpoint
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Listen port for the liveness endpoint (overrides $PORT)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

pub async fn run() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run { host, port } => {
            let mut config = AppConfig::from_env()?;
            if let Some(port) = port {
                config.port = port;
            }
            bot::run(host, config).await
        }
    }
}
