//! Demo track playback endpoints
//!
//! Playback is two steps: the gated URL mint, then the token-addressed
//! stream. The stream endpoint itself only validates the token; the access
//! decision already happened at mint time.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use trust_common::Error;

use crate::api::ApiError;
use crate::controller;
use crate::identity::Identity;
use crate::AppState;

/// Response of GET /api/track/:id/url
#[derive(Debug, Serialize)]
pub struct TrackUrlResponse {
    pub url: String,
    pub title: String,
}

/// GET /api/track/:id/url
///
/// Mints a time-limited playback URL after the access gate passes.
pub async fn track_url(
    State(state): State<AppState>,
    Path(id): Path<String>,
    identity: Identity,
) -> Result<Json<TrackUrlResponse>, ApiError> {
    let (url, title) = controller::track_url(&state, &identity, &id).await?;
    Ok(Json(TrackUrlResponse { url, title }))
}

/// GET /media/:token
///
/// Streams the granted file. Unknown or expired tokens and missing files
/// all surface as storage access failures.
pub async fn stream_media(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Response, ApiError> {
    let storage_path = state
        .media
        .redeem(&token)
        .ok_or_else(|| Error::StorageAccess("Unknown or expired media token".to_string()))?;

    // Storage paths are opaque keys, never absolute and never traversing
    if storage_path.starts_with('/') || storage_path.split('/').any(|part| part == "..") {
        return Err(ApiError(Error::StorageAccess(format!(
            "Invalid storage path: {}",
            storage_path
        ))));
    }

    let file_path = state.config.media_folder.join(&storage_path);
    let bytes = tokio::fs::read(&file_path).await.map_err(|e| {
        Error::StorageAccess(format!("Cannot read {}: {}", file_path.display(), e))
    })?;

    let content_type = content_type_for(&storage_path);
    Ok((StatusCode::OK, [("content-type", content_type)], bytes).into_response())
}

fn content_type_for(path: &str) -> &'static str {
    match path.rsplit('.').next() {
        Some("mp3") => "audio/mpeg",
        Some("ogg") => "audio/ogg",
        Some("wav") => "audio/wav",
        Some("m4a") => "audio/mp4",
        Some("flac") => "audio/flac",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_mapping() {
        assert_eq!(content_type_for("demo/a.mp3"), "audio/mpeg");
        assert_eq!(content_type_for("demo/a.ogg"), "audio/ogg");
        assert_eq!(content_type_for("demo/a.bin"), "application/octet-stream");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
