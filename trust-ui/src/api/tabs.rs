//! Tab and onboarding endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::api::ApiError;
use crate::controller::{self, Envelope};
use crate::identity::Identity;
use crate::AppState;

/// GET /api/tab/:name
///
/// Renders the named tab for the resolved identity. When no user row exists
/// yet the onboarding card is returned instead.
pub async fn open_tab(
    State(state): State<AppState>,
    Path(name): Path<String>,
    identity: Identity,
) -> Result<Json<Envelope>, ApiError> {
    let envelope = controller::open_tab(&state, &identity, &name).await?;
    Ok(Json(envelope))
}

/// Body of POST /api/role
#[derive(Debug, Deserialize)]
pub struct RoleChoice {
    pub role: trust_common::db::models::Role,
}

/// POST /api/role
///
/// One-time onboarding: creates the user row with the chosen role.
pub async fn choose_role(
    State(state): State<AppState>,
    identity: Identity,
    Json(choice): Json<RoleChoice>,
) -> Result<Json<Envelope>, ApiError> {
    let envelope = controller::choose_role(&state, &identity, choice.role).await?;
    Ok(Json(envelope))
}
