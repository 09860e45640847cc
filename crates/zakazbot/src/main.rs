use std::net::SocketAddr;

use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use tokio::net::TcpListener;

use zakazbot::webhook::{self, WebhookState};
use zakazbot::TelegramApi;
use zakazcore::{config, init_logger, BackendClient};

/// Telegram webhook service answering order-statistics commands
#[derive(Parser)]
#[command(name = "zakazbot")]
#[command(author, version, about = "Telegram webhook service answering order-statistics commands", long_about = None)]
struct Cli {
    /// Port to listen on
    #[arg(long, default_value_t = config::webhook::DEFAULT_PORT)]
    port: u16,

    /// Path to the log file
    #[arg(long)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger(cli.log_file.as_deref().unwrap_or(config::LOG_FILE_PATH.as_str()))?;

    // Load environment variables from .env if present
    let _ = dotenv();
    config::log_configuration();

    let state = WebhookState {
        api: TelegramApi::from_env(),
        backend: BackendClient::from_env(),
    };
    let app = webhook::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    let listener = TcpListener::bind(&addr).await?;
    log::info!("Webhook service listening on http://{}", addr);
    log::info!("  POST {}    - inbound updates", webhook::WEBHOOK_PATH);
    log::info!("  OPTIONS {} - CORS preflight", webhook::WEBHOOK_PATH);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    log::info!("Shutting down webhook service");
}
