//! RealmSim Engine - Main entry point.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use realmsim_engine::infrastructure::clock::{SystemClock, SystemRandom};
use realmsim_engine::infrastructure::config::AppConfig;
use realmsim_engine::infrastructure::definitions::StaticDefinitions;
use realmsim_engine::GameServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root so `cargo run -p realmsim-engine` works anywhere.
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "realmsim_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting RealmSim Engine");

    let config = AppConfig::from_env()?;
    tracing::info!(
        tick_interval_ms = config.tick_interval_ms,
        max_realms = config.max_realms,
        realm_max_players = config.realm_max_players,
        portal_spots = config.portal_spots.len(),
        "Configuration loaded"
    );

    let cancel = CancellationToken::new();
    setup_shutdown_signal(cancel.clone());

    // Definition files are loaded by the content pipeline; none are bundled.
    let definitions = Arc::new(StaticDefinitions::new());

    let server = GameServer::new(
        config,
        definitions,
        Arc::new(SystemClock::new()),
        Arc::new(SystemRandom::new()),
        cancel,
    );
    server.run().await;

    tracing::info!("RealmSim Engine stopped");
    Ok(())
}

/// Cancel `cancel` on Ctrl+C or SIGTERM.
fn setup_shutdown_signal(cancel: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
            }
            _ = terminate => {
                tracing::info!("Received SIGTERM, initiating graceful shutdown...");
            }
        }

        cancel.cancel();
    });
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
