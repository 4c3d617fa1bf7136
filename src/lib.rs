pub mod config;
pub mod error;
pub mod flow;
pub mod gemini;
pub mod logging;
pub mod model;
pub mod server;
pub mod submission;
pub mod validation;

use tokio::sync::watch;

use config::AppConfig;

/// Boot the analysis server: logging, env config, tokio runtime, graceful
/// shutdown on ctrl-c.
pub fn run() {
    logging::init();

    if dotenvy::dotenv().is_ok() {
        tracing::debug!("Loaded environment from .env");
    }

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "configuration invalid");
            std::process::exit(1);
        }
    };

    tracing::info!("Starting AdLift v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!(?config, "resolved configuration");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build tokio runtime");

    runtime.block_on(async move {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received");
                let _ = shutdown_tx.send(true);
            }
        });

        if let Err(err) = server::start_server(config, shutdown_rx).await {
            tracing::error!(error = %err, "server exited with error");
            std::process::exit(1);
        }
    });
}
