//! trust-ui library - TRUST chart web service
//!
//! Serves the single-page shell and the fragment API behind it: trust chart,
//! growth feed, profile editing, artist detail modal, support/unlock
//! actions, and time-limited demo track access.

use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;
use trust_common::config::TrustConfig;

pub mod api;
pub mod controller;
pub mod identity;
pub mod media;
pub mod render;
pub mod session;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Service configuration (prices, media folder, chart limit)
    pub config: Arc<TrustConfig>,
    /// Per-viewer view-controller sessions
    pub sessions: session::SessionMap,
    /// Outstanding time-limited media grants
    pub media: media::MediaTokens,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, config: TrustConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
            sessions: session::SessionMap::new(),
            media: media::MediaTokens::new(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/static/trust.css", get(api::serve_trust_css))
        .merge(api::health_routes())
        .route("/api/tab/:name", get(api::open_tab))
        .route("/api/role", post(api::choose_role))
        .route("/api/artist/:id", get(api::open_artist))
        .route("/api/artist/:id/support", post(api::support_artist))
        .route("/api/artist/:id/unlock", post(api::unlock_demo))
        .route("/api/profile", post(api::save_profile))
        .route("/api/role/switch", post(api::switch_role))
        .route("/api/track/:id/url", get(api::track_url))
        .route("/media/:token", get(api::stream_media))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
