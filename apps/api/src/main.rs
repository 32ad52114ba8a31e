mod analysis;
mod config;
mod documents;
mod errors;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::catalog::KeywordCatalog;
use crate::analysis::scorer::build_scorer;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; malformed values abort startup
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS API v{}", env!("CARGO_PKG_VERSION"));

    // Optional catalog override, otherwise the profile's built-in table
    let catalog = config
        .catalog_path
        .as_deref()
        .map(KeywordCatalog::from_json_file)
        .transpose()?;

    let scorer = build_scorer(config.scoring_profile, catalog)?;
    info!(
        "Scorer initialized (profile: {}, {} keywords, optimized by default: {})",
        scorer.profile(),
        scorer.catalog().len(),
        config.optimized_scoring
    );
    info!(
        "Upload limit {} bytes, minimum resume length {} chars, accepted types: {}",
        config.max_upload_bytes,
        config.min_resume_chars,
        config.accepted_mime_types.join(", ")
    );

    let state = AppState {
        config: config.clone(),
        scorer,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
