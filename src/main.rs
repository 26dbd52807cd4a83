use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use magic8::{Config, Magic8Ball};

mod cli;

#[derive(Parser)]
#[command(name = "magic8")]
#[command(about = "Ask the Magic 8 Ball a yes/no question")]
#[command(version)]
struct Cli {
    /// Path to the store file
    #[arg(long, default_value = "magic8.db")]
    db: PathBuf,

    /// Keep settings and profile in memory only
    #[arg(long, conflicts_with = "db")]
    memory: bool,

    /// Skip the shake and thinking delays
    #[arg(long)]
    instant: bool,

    /// Set the player name
    #[arg(long)]
    name: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "magic8=info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = if cli.instant {
        Config::instant()
    } else {
        Config::default()
    };

    let ball = if cli.memory {
        Magic8Ball::in_memory(config)?
    } else {
        Magic8Ball::open(&cli.db, config)
            .with_context(|| format!("opening store {}", cli.db.display()))?
    };
    let ball = Arc::new(ball.with_platform(Arc::new(cli::TerminalPlatform)));

    if let Some(name) = cli.name {
        ball.set_profile_name(name)?;
    }

    cli::run(ball).await
}
