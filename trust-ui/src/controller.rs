//! View controller
//!
//! Orchestrates the boot sequence, tab loads, the artist detail modal and
//! the mutating actions (support, unlock, profile save, role switch). Every
//! tab or modal request re-fetches its data and fully re-renders; the only
//! cached state lives in the per-viewer [`Session`].

use serde::Serialize;
use tracing::{info, warn};

use trust_common::db::models::{Role, User};
use trust_common::db::store::{self, ArtistPatch, NewUser};
use trust_common::growth::{self, Growth};
use trust_common::{gate, Error, Result};

use crate::identity::Identity;
use crate::render;
use crate::session::{Session, Tab};
use crate::AppState;

/// Response envelope consumed by the shell
#[derive(Debug, Default, Serialize)]
pub struct Envelope {
    /// Fragment to render (main area or modal sheet)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Transient notification, auto-dismissed by the shell after ~2.4 s
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toast: Option<String>,
    /// Header pill data, present on tab loads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pills: Option<Pills>,
    /// Shell must restart the boot sequence (role switch)
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub reload: bool,
    /// The fragment is the one-time onboarding card
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub onboarding: bool,
}

#[derive(Debug, Serialize)]
pub struct Pills {
    pub role: String,
    pub stars: i64,
}

impl Envelope {
    fn fragment(html: String) -> Self {
        Envelope {
            html: Some(html),
            ..Default::default()
        }
    }

    fn with_toast(mut self, toast: impl Into<String>) -> Self {
        self.toast = Some(toast.into());
        self
    }

    fn with_pills(mut self, user: &User) -> Self {
        self.pills = Some(Pills {
            role: user.role.as_str().to_string(),
            stars: user.stars_balance,
        });
        self
    }
}

/// Fetch-or-refresh the viewer's session.
///
/// `None` means no user row exists yet and onboarding must run. For artist
/// roles the artist profile is lazily created here, which makes its failure
/// part of the boot path.
async fn boot_session(state: &AppState, identity: &Identity) -> Result<Option<Session>> {
    let Some(user) = store::find_user_by_telegram_id(&state.db, &identity.id).await? else {
        return Ok(None);
    };

    let my_artist = match user.role {
        Role::Artist => Some(store::ensure_artist(&state.db, &user).await?),
        Role::Fan => None,
    };

    Ok(Some(state.sessions.refresh(&identity.id, user, my_artist)))
}

/// Open a tab: re-fetch what the tab needs and fully re-render it.
pub async fn open_tab(state: &AppState, identity: &Identity, tab_name: &str) -> Result<Envelope> {
    let tab = Tab::from_name(tab_name)
        .ok_or_else(|| Error::NotFound(format!("tab {}", tab_name)))?;

    let Some(mut session) = boot_session(state, identity).await? else {
        return Ok(Envelope {
            html: Some(render::onboarding_card()),
            onboarding: true,
            ..Default::default()
        });
    };

    state.sessions.set_tab(&identity.id, tab);

    let html = match tab {
        Tab::Trust => {
            let artists = store::list_artists(&state.db, state.config.chart_limit).await?;
            state
                .sessions
                .set_cached_artists(&identity.id, artists.clone());
            session.cached_artists = artists;
            render::trust_tab(
                &session.user,
                session.my_artist.as_ref(),
                &session.cached_artists,
            )
        }
        Tab::Growth => {
            let top: Vec<_> = session.cached_artists.iter().take(8).cloned().collect();
            render::growth_tab(&session.user, session.my_artist.as_ref(), &top)
        }
        Tab::Profile => render::profile_tab(&session.user, session.my_artist.as_ref()),
    };

    Ok(Envelope::fragment(html).with_pills(&session.user))
}

/// One-time onboarding: create the user row with the chosen role, then
/// render the initial trust tab.
pub async fn choose_role(state: &AppState, identity: &Identity, role: Role) -> Result<Envelope> {
    if store::find_user_by_telegram_id(&state.db, &identity.id)
        .await?
        .is_some()
    {
        // Already onboarded (double submit); just render the current tab
        return open_tab(state, identity, Tab::Trust.as_str()).await;
    }

    let new_user = NewUser {
        telegram_id: identity.id.clone(),
        username: identity.username.clone(),
        first_name: identity.first_name.clone(),
        last_name: identity.last_name.clone(),
        role,
    };
    let user = store::create_user(&state.db, &new_user).await?;
    info!(
        "Created user {} (role {}, fallback identity: {})",
        user.id,
        role.as_str(),
        identity.is_fallback
    );

    let envelope = open_tab(state, identity, Tab::Trust.as_str()).await?;
    Ok(envelope.with_toast("Profile created. Welcome to TRUST."))
}

/// Open the artist detail modal: latest artist row, purchase check, and the
/// track list only when the gate passes.
pub async fn open_artist(state: &AppState, identity: &Identity, artist_id: &str) -> Result<Envelope> {
    let session = require_session(state, identity).await?;
    let html = render_modal(state, &session, artist_id).await?;
    Ok(Envelope::fragment(html))
}

async fn render_modal(state: &AppState, session: &Session, artist_id: &str) -> Result<String> {
    let artist = store::get_artist(&state.db, artist_id).await?;
    let owner = gate::is_owner(&session.user, session.my_artist.as_ref(), &artist.id);
    let has_purchase = store::has_demo_purchase(&state.db, &session.user.id, &artist.id).await?;
    let has_demo = gate::can_view_private_content(owner, has_purchase);

    // Only query tracks that could actually be shown
    let tracks = if has_demo {
        store::list_tracks(&state.db, &artist.id).await?
    } else {
        Vec::new()
    };

    Ok(render::artist_modal(
        &artist,
        owner,
        has_demo,
        &tracks,
        state.config.demo_price_stars,
    ))
}

/// Support action: insert the Vote fact, then persist the growth update.
///
/// Two independent writes, no transaction between them; an error after the
/// vote leaves growth unapplied (accepted, as in the source system).
pub async fn support_artist(
    state: &AppState,
    identity: &Identity,
    artist_id: &str,
) -> Result<Envelope> {
    let session = require_session(state, identity).await?;

    let artist = store::get_artist(&state.db, artist_id).await?;
    store::insert_vote(&state.db, &session.user.id, &artist.id).await?;

    let next = growth::apply_support(Growth::from(&artist));
    let updated = store::apply_growth(&state.db, &artist.id, &next).await?;

    if session
        .my_artist
        .as_ref()
        .is_some_and(|mine| mine.id == updated.id)
    {
        state.sessions.set_my_artist(&identity.id, updated.clone());
    }

    let session = require_session(state, identity).await?;
    let html = render_modal(state, &session, artist_id).await?;
    Ok(Envelope::fragment(html).with_toast("🔥 Support counted. Growth is on."))
}

/// Unlock the demo for this artist.
///
/// Uniqueness lives in the store; a duplicate insert is a soft success and
/// re-renders the modal as already unlocked.
pub async fn unlock_demo(state: &AppState, identity: &Identity, artist_id: &str) -> Result<Envelope> {
    let session = require_session(state, identity).await?;
    let price = state.config.demo_price_stars;

    match store::insert_demo_purchase(&state.db, &session.user.id, artist_id, price).await {
        Ok(_) => {
            let html = render_modal(state, &session, artist_id).await?;
            Ok(Envelope::fragment(html).with_toast(format!("🎧 Demo unlocked ({price}★).")))
        }
        Err(err) if err.is_duplicate() => {
            warn!(
                "Duplicate demo purchase for user {} artist {}",
                session.user.id, artist_id
            );
            let html = render_modal(state, &session, artist_id).await?;
            Ok(Envelope::fragment(html).with_toast("Demo already unlocked."))
        }
        Err(err) => Err(err),
    }
}

/// Save the artist profile edit. Lengths are enforced before any write.
pub async fn save_profile(
    state: &AppState,
    identity: &Identity,
    patch: ArtistPatch,
) -> Result<Envelope> {
    let session = require_session(state, identity).await?;
    let Some(my_artist) = session.my_artist.as_ref() else {
        return Err(Error::InvalidInput(
            "Only artists can edit an artist profile".to_string(),
        ));
    };

    let updated = store::update_artist_profile(&state.db, &my_artist.id, &patch).await?;
    state.sessions.set_my_artist(&identity.id, updated.clone());

    let html = render::profile_tab(&session.user, Some(&updated));
    Ok(Envelope::fragment(html).with_toast("Saved."))
}

/// Toggle fan/artist. Modeled as a full reload: the session is dropped and
/// the shell restarts the boot sequence.
pub async fn switch_role(state: &AppState, identity: &Identity) -> Result<Envelope> {
    let session = require_session(state, identity).await?;

    let next = session.user.role.toggled();
    store::update_user_role(&state.db, &session.user.id, next).await?;
    state.sessions.remove(&identity.id);
    info!("User {} switched role to {}", session.user.id, next.as_str());

    Ok(Envelope {
        reload: true,
        ..Default::default()
    }
    .with_toast("Role changed. Reloading…"))
}

/// Mint a time-limited playback URL for a demo track, gate checked.
pub async fn track_url(
    state: &AppState,
    identity: &Identity,
    track_id: &str,
) -> Result<(String, String)> {
    let session = require_session(state, identity).await?;

    let track = store::get_track(&state.db, track_id).await?;
    let owner = gate::is_owner(&session.user, session.my_artist.as_ref(), &track.artist_id);
    let has_purchase =
        store::has_demo_purchase(&state.db, &session.user.id, &track.artist_id).await?;
    if !gate::can_view_private_content(owner, has_purchase) {
        return Err(Error::InvalidInput("Demo access is locked".to_string()));
    }

    let token = state.media.mint(&track.storage_path);
    Ok((format!("/media/{}", token), track.title))
}

async fn require_session(state: &AppState, identity: &Identity) -> Result<Session> {
    boot_session(state, identity)
        .await?
        .ok_or_else(|| Error::Boot("No profile yet - complete onboarding first".to_string()))
}
