//! cointerm - a terminal client for a crypto trading platform.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use cointerm::{App, Config};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "cointerm", version, about = "Trade crypto from the terminal")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the backend base URL.
    #[arg(long, env = "COINTERM_BASE_URL")]
    base_url: Option<String>,
}

/// Logs go to a daily file; stdout belongs to the terminal UI.
fn init_logging() -> anyhow::Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = cointerm::config::log_dir()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::daily(&log_dir, "cointerm.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "cointerm=info".into()))
        .with(fmt::layer().with_writer(writer).with_target(false).with_ansi(false))
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging()?;

    let mut config = Config::load(cli.config).context("loading configuration")?;
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }
    tracing::info!(base_url = %config.api.base_url, "Starting cointerm");

    let mut app = App::new(config).context("initializing application")?;
    app.run().await?;

    Ok(())
}
