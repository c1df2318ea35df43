//! Terminal front-end for the print-waste estimation service.

mod config;
mod session;

use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use offcut_client::CalculationClient;
use offcut_history::{HistoryCache, HistoryStore};

use crate::config::AppConfig;
use crate::session::Session;

const LOG_FILENAME: &str = "offcut.log";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    if let Some(file) = open_log_file() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();
        return;
    }

    // If we can't open a log file, prefer "no logs" over interleaving them
    // with the interactive session output.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> Option<File> {
    let path = log_file_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}

fn log_file_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("offcut").join(LOG_FILENAME))
}

fn open_store(config: &AppConfig) -> Result<HistoryStore> {
    match &config.history.slot_path {
        Some(path) => Ok(HistoryStore::at_path(path.clone())),
        None => HistoryStore::open_default().context("opening history store"),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::load().context("loading configuration")?;
    tracing::info!(
        server = config.server.base_url(),
        policy = ?config.fallback,
        capacity = config.history.capacity,
        "Starting session"
    );

    let client = CalculationClient::new(&config.server, config.fallback)
        .context("building calculation client")?;
    let store = open_store(&config)?;
    let cache = HistoryCache::new(store, config.history.capacity);

    Session::new(client, cache).run().await
}
