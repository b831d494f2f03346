//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Viewer role, chosen once at onboarding and switchable from the profile tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Fan,
    Artist,
}

impl Role {
    pub fn toggled(self) -> Role {
        match self {
            Role::Fan => Role::Artist,
            Role::Artist => Role::Fan,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Fan => "fan",
            Role::Artist => "artist",
        }
    }
}

/// Chart trend marker
///
/// Only `up` is ever derived (by the growth engine, on every support
/// action); `flat` is the creation default and `down` only arrives as
/// external data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    /// External platform identity (stringified numeric id, or guest id)
    pub telegram_id: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
    pub fan_level: i64,
    pub fan_hp: i64,
    pub stars_balance: i64,
    /// Reserved paid-entry gate, never set by current flows
    pub entry_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Artist {
    pub id: String,
    pub user_id: String,
    pub project_name: String,
    pub currency_name: String,
    pub comment: String,
    pub private_link: String,
    /// Chart ranking key, +1 per support action
    pub trust_score: i64,
    pub level: i64,
    pub hp: i64,
    pub votes_total: i64,
    /// Defined but not incremented by any current action
    pub supporters_count: i64,
    pub trend: Trend,
    pub last_activity_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Vote {
    pub id: String,
    pub fan_user_id: String,
    pub artist_id: String,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DemoPurchase {
    pub id: String,
    pub user_id: String,
    pub artist_id: String,
    pub stars_amount: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Track {
    pub id: String,
    pub artist_id: String,
    pub title: String,
    /// Opaque key into the media folder, set when tracks are seeded
    pub storage_path: String,
    pub created_at: DateTime<Utc>,
}
