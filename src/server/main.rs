//! HTTP API for coordinate transformation.
//!
//! JSON surface over the batch transform pipeline: submit points, get
//! one annotated row back per point, plus registry inspection and a
//! health endpoint.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use wabash::config::Config;
use wabash::locate::{detection_chain, fetch_county_boundaries, CountySpatialIndex, LocatorChain};
use wabash::models::{County, InputPoint, RowOutcome};
use wabash::registry::{CrsRegistry, RegistryEntry};
use wabash::transform::{CountyChoice, Transformer};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Indiana coordinate transformation API")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: String,

    /// Optional TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip the county boundary download (bounding-box detection only)
    #[arg(long)]
    offline: bool,
}

/// Application state shared across handlers
struct AppState {
    config: Config,
    chain: LocatorChain,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let config = Config::load_or_default(args.config.as_deref())?;

    info!("Wabash transformation server");

    // Fail fast on an unreadable registry; it is re-read per request
    // afterwards so edits show up without a restart.
    let registry = CrsRegistry::load(&config.registry_path)?;
    let (verified, total) = registry.verification_summary();
    info!("Registry: {} counties, {} verified", total, verified);

    let index = if args.offline {
        info!("Offline mode: bounding-box detection only");
        None
    } else {
        match fetch_county_boundaries(
            &config.boundary_url,
            Duration::from_secs(config.fetch_timeout_secs),
        )
        .await
        {
            Ok(boundaries) => Some(CountySpatialIndex::build(boundaries)),
            Err(e) => {
                warn!(
                    "County boundary download failed ({}); falling back to bounding-box detection",
                    e
                );
                None
            }
        }
    };
    let chain = detection_chain(index);

    let state = Arc::new(AppState { config, chain });

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/transform", post(transform_handler))
        .route("/v1/registry", get(registry_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    /// Whether exact polygon detection is available, or only the
    /// bounding-box fallback.
    polygon_index: bool,
    registry_counties: usize,
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let registry_counties = CrsRegistry::load(&state.config.registry_path)
        .map(|r| r.len())
        .unwrap_or(0);

    Json(HealthResponse {
        status: if registry_counties > 0 { "ok" } else { "degraded" },
        polygon_index: state.chain.len() > 1,
        registry_counties,
    })
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
struct TransformRequest {
    points: Vec<InputPoint>,

    /// Fixed county name for every point; ignored when auto_detect is on.
    #[serde(default)]
    county: Option<String>,

    #[serde(default = "default_true")]
    auto_detect: bool,
}

#[derive(Serialize)]
struct TransformResponse {
    rows: Vec<RowOutcome>,
    registry_verified: usize,
    registry_total: usize,
}

async fn transform_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TransformRequest>,
) -> Result<Json<TransformResponse>, (StatusCode, String)> {
    // Per-request registry read: the CSV is the source of truth and may
    // have been edited since the last request.
    let registry = CrsRegistry::load(&state.config.registry_path)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let choice = if request.auto_detect {
        CountyChoice::Auto
    } else if let Some(name) = &request.county {
        CountyChoice::Fixed(County::new(name))
    } else {
        CountyChoice::Skip
    };

    let transformer = Transformer::new(&registry, &state.chain)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let rows = transformer.transform_batch(&request.points, &choice);
    let (registry_verified, registry_total) = registry.verification_summary();

    Ok(Json(TransformResponse {
        rows,
        registry_verified,
        registry_total,
    }))
}

#[derive(Serialize)]
struct RegistryResponse {
    verified: usize,
    total: usize,
    entries: Vec<RegistryEntry>,
}

async fn registry_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RegistryResponse>, (StatusCode, String)> {
    let registry = CrsRegistry::load(&state.config.registry_path)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let (verified, total) = registry.verification_summary();
    let mut entries: Vec<RegistryEntry> = registry.entries().cloned().collect();
    entries.sort_by(|a, b| a.county.cmp(&b.county));

    Ok(Json(RegistryResponse {
        verified,
        total,
        entries,
    }))
}
