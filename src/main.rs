use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::CorsLayer;

use renovation_consult::channels::CliChannel;
use renovation_consult::config::{ConsultConfig, RunMode};
use renovation_consult::consultation::{
    ConsultationManager, ConsultationRouteState, TransitionEngine, consultation_routes,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = ConsultConfig::from_env().context("reading RENO_CONSULT_* configuration")?;

    let engine = TransitionEngine::new(config.seed_measurement);
    let manager = Arc::new(ConsultationManager::with_receipt_seed(
        engine,
        config.receipt_seed,
    ));

    eprintln!("🛠  Renovation Consult v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Mode: {}", config.mode);
    eprintln!("   Session: {}", manager.session_id());

    match config.mode {
        RunMode::Cli => {
            eprintln!("   Type help for commands, /quit to exit.\n");
            CliChannel::new(Arc::clone(&manager), config.settle)
                .run()
                .await
                .context("terminal session failed")?;
        }
        RunMode::Http => {
            let app = consultation_routes(ConsultationRouteState {
                manager: Arc::clone(&manager),
            })
            .layer(CorsLayer::permissive());

            let addr = format!("0.0.0.0:{}", config.port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("binding {addr}"))?;
            eprintln!("   API: http://{addr}/api/consultation/session\n");
            tracing::info!(port = config.port, "Consultation API started");
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    tokio::signal::ctrl_c().await.ok();
                })
                .await
                .context("serving consultation API")?;
        }
    }

    tracing::info!(session_id = %manager.session_id(), "Shutting down");
    Ok(())
}
