mod chat;
mod cli;
mod config;
mod logging;
mod tui;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use tracing::info;

use crate::chat::{ChatBackend, ChatClient};
use crate::cli::Cli;
use crate::config::AppConfig;
use crate::tui::TuiApp;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    let level = cli
        .log_level
        .clone()
        .or_else(|| std::env::var("HOROSCOPE_LOG").ok())
        .unwrap_or_else(|| "info".to_string());
    let cfg = AppConfig::from_cli(&cli)?;
    logging::init_logging(&level, &cfg.log_file)?;
    info!(?cfg, "app config");

    let backend: Arc<dyn ChatBackend> =
        Arc::new(ChatClient::with_network_config(cfg.endpoint.clone(), cfg.network)?);

    if cli.no_tui {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        cli::plain::run_plain(backend, stdin.lock(), &mut stdout).await?;
        return Ok(());
    }

    let mut app = TuiApp::new(cfg.title.clone(), &cfg.theme, backend);
    app.run()
}
