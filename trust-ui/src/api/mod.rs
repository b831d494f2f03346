//! HTTP API handlers for trust-ui

pub mod artist;
pub mod health;
pub mod media;
pub mod profile;
pub mod shell;
pub mod tabs;

pub use artist::{open_artist, support_artist, unlock_demo};
pub use health::health_routes;
pub use media::{stream_media, track_url};
pub use profile::{save_profile, switch_role};
pub use shell::{serve_app_js, serve_index, serve_trust_css};
pub use tabs::{choose_role, open_tab};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;
use trust_common::Error;

/// Handler-level error wrapper: logs, then renders the shell envelope with
/// an error toast and a matching status code.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::Duplicate(_) => StatusCode::CONFLICT,
            Error::StorageAccess(_) => StatusCode::NOT_FOUND,
            Error::Boot(_)
            | Error::Config(_)
            | Error::Io(_)
            | Error::StoreRead(_)
            | Error::StoreWrite(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        error!("Request failed: {}", self.0);

        let message = self.0.to_string();
        let body = Json(json!({
            "error": message,
            "toast": message,
        }));

        (status, body).into_response()
    }
}
