//! Artist detail modal and its actions

use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::ApiError;
use crate::controller::{self, Envelope};
use crate::identity::Identity;
use crate::AppState;

/// GET /api/artist/:id
///
/// Artist detail modal. Always re-fetches the artist row so growth numbers
/// are never stale.
pub async fn open_artist(
    State(state): State<AppState>,
    Path(id): Path<String>,
    identity: Identity,
) -> Result<Json<Envelope>, ApiError> {
    let envelope = controller::open_artist(&state, &identity, &id).await?;
    Ok(Json(envelope))
}

/// POST /api/artist/:id/support
pub async fn support_artist(
    State(state): State<AppState>,
    Path(id): Path<String>,
    identity: Identity,
) -> Result<Json<Envelope>, ApiError> {
    let envelope = controller::support_artist(&state, &identity, &id).await?;
    Ok(Json(envelope))
}

/// POST /api/artist/:id/unlock
///
/// Duplicate unlocks are a soft success (modal re-renders as unlocked).
pub async fn unlock_demo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    identity: Identity,
) -> Result<Json<Envelope>, ApiError> {
    let envelope = controller::unlock_demo(&state, &identity, &id).await?;
    Ok(Json(envelope))
}
