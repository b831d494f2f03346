//! Profile editing and role switching

use axum::{extract::State, Json};
use trust_common::db::store::ArtistPatch;

use crate::api::ApiError;
use crate::controller::{self, Envelope};
use crate::identity::Identity;
use crate::AppState;

/// POST /api/profile
///
/// Artist profile save; field lengths are enforced before any store write.
pub async fn save_profile(
    State(state): State<AppState>,
    identity: Identity,
    Json(patch): Json<ArtistPatch>,
) -> Result<Json<Envelope>, ApiError> {
    let envelope = controller::save_profile(&state, &identity, patch).await?;
    Ok(Json(envelope))
}

/// POST /api/role/switch
///
/// Toggles fan/artist and drops the session; the shell reloads and reruns
/// the boot sequence.
pub async fn switch_role(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Envelope>, ApiError> {
    let envelope = controller::switch_role(&state, &identity).await?;
    Ok(Json(envelope))
}
