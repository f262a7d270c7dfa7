mod action;
mod app;
mod keys;
mod ui;
mod watcher;

use anyhow::Context;
use tokio::sync::mpsc;

use mq_proto::config::Config;
use mq_proto::MpdClient;

use crate::action::Action;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = mq_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("mq.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; the TUI owns the terminal, so logs go to a
    // file with ANSI disabled.
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    tracing::info!("mq starting…");

    let config = Config::load().unwrap_or_default();
    let client = MpdClient::new(config.mpd.address.clone());

    // Fail before touching the terminal if the server is unreachable.
    let snapshot = client
        .snapshot()
        .await
        .with_context(|| format!("could not fetch state from mpd at {}", config.mpd.address))?;

    let (tx, rx) = mpsc::channel::<Action>(1024);
    watcher::spawn(client.clone(), tx.clone());

    let app = app::App::new(client, snapshot, config.ui.seek_step_secs);
    app.run(tx, rx).await
}
