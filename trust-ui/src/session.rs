//! Per-viewer view-controller sessions
//!
//! One session per resolved identity: current user row, own artist profile
//! (artist role only), selected tab and the cached chart used by the growth
//! feed and list lookups. All mutation goes through [`SessionMap`] methods;
//! there is no other shared mutable state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use trust_common::db::models::{Artist, User};

/// UI tab; initial state is Trust, transitions only on explicit selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Trust,
    Growth,
    Profile,
}

impl Tab {
    pub fn from_name(name: &str) -> Option<Tab> {
        match name {
            "trust" => Some(Tab::Trust),
            "growth" => Some(Tab::Growth),
            "profile" => Some(Tab::Profile),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Trust => "trust",
            Tab::Growth => "growth",
            Tab::Profile => "profile",
        }
    }
}

/// View-controller state for one viewer
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    /// Own artist profile, present iff role is artist
    pub my_artist: Option<Artist>,
    pub tab: Tab,
    /// Last-fetched chart; growth feed and list lookups read this, detail
    /// views always re-fetch
    pub cached_artists: Vec<Artist>,
}

impl Session {
    pub fn new(user: User, my_artist: Option<Artist>) -> Self {
        Session {
            user,
            my_artist,
            tab: Tab::default(),
            cached_artists: Vec::new(),
        }
    }
}

/// Session registry keyed by external identity id
#[derive(Clone, Default)]
pub struct SessionMap {
    inner: Arc<Mutex<HashMap<String, Session>>>,
}

impl SessionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh (or create) a session with freshly fetched rows, keeping the
    /// previously selected tab and cached chart.
    pub fn refresh(&self, identity_id: &str, user: User, my_artist: Option<Artist>) -> Session {
        let mut map = self.inner.lock().expect("session map poisoned");
        let session = map
            .entry(identity_id.to_string())
            .and_modify(|s| {
                s.user = user.clone();
                s.my_artist = my_artist.clone();
            })
            .or_insert_with(|| Session::new(user, my_artist));
        session.clone()
    }

    pub fn get(&self, identity_id: &str) -> Option<Session> {
        self.inner
            .lock()
            .expect("session map poisoned")
            .get(identity_id)
            .cloned()
    }

    pub fn set_tab(&self, identity_id: &str, tab: Tab) {
        if let Some(session) = self
            .inner
            .lock()
            .expect("session map poisoned")
            .get_mut(identity_id)
        {
            session.tab = tab;
        }
    }

    pub fn set_cached_artists(&self, identity_id: &str, artists: Vec<Artist>) {
        if let Some(session) = self
            .inner
            .lock()
            .expect("session map poisoned")
            .get_mut(identity_id)
        {
            session.cached_artists = artists;
        }
    }

    /// Update the cached own-artist row after a profile edit or a support
    /// action that landed on it.
    pub fn set_my_artist(&self, identity_id: &str, artist: Artist) {
        if let Some(session) = self
            .inner
            .lock()
            .expect("session map poisoned")
            .get_mut(identity_id)
        {
            session.my_artist = Some(artist);
        }
    }

    /// Drop a session entirely (role switch restarts the boot sequence).
    pub fn remove(&self, identity_id: &str) {
        self.inner
            .lock()
            .expect("session map poisoned")
            .remove(identity_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use trust_common::db::models::Role;

    fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            telegram_id: id.to_string(),
            username: None,
            first_name: None,
            last_name: None,
            role: Role::Fan,
            fan_level: 1,
            fan_hp: 15,
            stars_balance: 0,
            entry_active: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_initial_tab_is_trust() {
        let sessions = SessionMap::new();
        let session = sessions.refresh("a", user("a"), None);
        assert_eq!(session.tab, Tab::Trust);
    }

    #[test]
    fn test_refresh_preserves_tab() {
        let sessions = SessionMap::new();
        sessions.refresh("a", user("a"), None);
        sessions.set_tab("a", Tab::Profile);

        let refreshed = sessions.refresh("a", user("a"), None);
        assert_eq!(refreshed.tab, Tab::Profile);
    }

    #[test]
    fn test_remove_forgets_state() {
        let sessions = SessionMap::new();
        sessions.refresh("a", user("a"), None);
        sessions.set_tab("a", Tab::Growth);
        sessions.remove("a");

        assert!(sessions.get("a").is_none());
        let session = sessions.refresh("a", user("a"), None);
        assert_eq!(session.tab, Tab::Trust);
    }

    #[test]
    fn test_tab_names() {
        assert_eq!(Tab::from_name("trust"), Some(Tab::Trust));
        assert_eq!(Tab::from_name("growth"), Some(Tab::Growth));
        assert_eq!(Tab::from_name("profile"), Some(Tab::Profile));
        assert_eq!(Tab::from_name("settings"), None);
    }
}
