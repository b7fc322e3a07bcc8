//! Ledger HTTP server binary

use ledger_service::{http, ledger, Config, Ledger};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional .env for local runs; must land before the env filter reads
    // RUST_LOG and before Config::from_env
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Ledger server starting...");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded - listen: {}, snapshot: {} every {}s",
        config.listen_addr,
        config.snapshot.path.display(),
        config.snapshot.interval_secs
    );

    // Restore state; any load failure is fatal
    let listen_addr = config.listen_addr.clone();
    let ledger = Arc::new(Ledger::open(config)?);
    info!(accounts = ledger.account_count(), "Ledger opened");

    // One periodic snapshotter for the whole process
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let snapshot_task = tokio::spawn(ledger::run_snapshot_loop(Arc::clone(&ledger), shutdown_rx));

    let app = http::router(Arc::clone(&ledger));
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    info!("Listening on {listen_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The listener is closed and in-flight requests have finished. Stop
    // the periodic snapshotter and wait out any snapshot it already
    // started before writing the final one.
    info!("Draining: stopping the snapshot task");
    let _ = shutdown_tx.send(true);
    if let Err(err) = snapshot_task.await {
        error!("Snapshot task panicked: {err}");
    }

    match ledger.snapshot_now() {
        Ok(count) => info!(accounts = count, "Final snapshot written"),
        Err(err) => error!("Final snapshot failed: {err}"),
    }

    info!("Ledger server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Termination signal received, draining");
}
