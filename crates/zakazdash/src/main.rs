use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use tokio::sync::watch;

use zakazdash::server::{self, AppState};
use zakazcore::{config, init_logger, realtime, BackendClient};

/// Realtime order dashboard
#[derive(Parser)]
#[command(name = "zakazdash")]
#[command(author, version, about = "Realtime order dashboard — live stats and recent orders", long_about = None)]
struct Cli {
    /// Port to listen on
    #[arg(long, default_value_t = config::dashboard::DEFAULT_PORT)]
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

    let backend = BackendClient::from_env();
    let state = AppState::new(backend);

    // The live channel is optional at startup: without it the dashboard
    // still serves the initial snapshot.
    let subscription = match realtime::subscribe_to_orders(
        config::SUPABASE_URL.as_str(),
        config::SUPABASE_SERVICE_ROLE_KEY.as_str(),
    )
    .await
    {
        Ok(subscription) => Some(subscription),
        Err(e) => {
            log::error!("Failed to open the live update channel: {}", e);
            None
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let dashboard_task = tokio::spawn(server::run_dashboard(
        state.clone(),
        subscription,
        shutdown_rx.clone(),
    ));

    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        log::info!("Shutting down dashboard");
        let _ = shutdown_tx.send(true);
    });

    server::serve(cli.port, state, shutdown_rx).await?;
    let _ = dashboard_task.await;
    Ok(())
}
