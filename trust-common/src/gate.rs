//! Access gate for private artist content
//!
//! Private link and demo tracks are visible only to the profile owner or to
//! a viewer holding a demo purchase for exactly that artist. The gate is a
//! predicate over already-fetched facts; nothing is cached here.

use crate::db::models::{Artist, Role, User};

/// True iff the viewer owns the artist profile being viewed.
pub fn is_owner(viewer: &User, my_artist: Option<&Artist>, artist_id: &str) -> bool {
    viewer.role == Role::Artist && my_artist.is_some_and(|a| a.id == artist_id)
}

/// True iff private content (link, tracks) may be shown.
///
/// `has_purchase` must refer to a demo purchase for the same (viewer,
/// artist) pair the `owner` flag was computed for.
pub fn can_view_private_content(owner: bool, has_purchase: bool) -> bool {
    owner || has_purchase
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Artist, Role, Trend, User};
    use chrono::Utc;

    fn user(role: Role) -> User {
        User {
            id: "user-1".to_string(),
            telegram_id: "100".to_string(),
            username: None,
            first_name: None,
            last_name: None,
            role,
            fan_level: 1,
            fan_hp: 15,
            stars_balance: 0,
            entry_active: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn artist(id: &str) -> Artist {
        Artist {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            project_name: "NEW".to_string(),
            currency_name: "MANTA".to_string(),
            comment: String::new(),
            private_link: String::new(),
            trust_score: 10,
            level: 1,
            hp: 20,
            votes_total: 0,
            supporters_count: 0,
            trend: Trend::Flat,
            last_activity_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_sees_own_content() {
        let viewer = user(Role::Artist);
        let mine = artist("artist-1");
        assert!(is_owner(&viewer, Some(&mine), "artist-1"));
        assert!(can_view_private_content(true, false));
    }

    #[test]
    fn test_fan_without_purchase_blocked() {
        let viewer = user(Role::Fan);
        assert!(!is_owner(&viewer, None, "artist-1"));
        assert!(!can_view_private_content(false, false));
    }

    #[test]
    fn test_purchase_grants_access() {
        assert!(can_view_private_content(false, true));
    }

    #[test]
    fn test_artist_role_does_not_own_other_profiles() {
        let viewer = user(Role::Artist);
        let mine = artist("artist-1");
        assert!(!is_owner(&viewer, Some(&mine), "artist-2"));
    }
}
