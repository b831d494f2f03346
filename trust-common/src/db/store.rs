//! Profile store adapter
//!
//! Read-or-create semantics for users and artist profiles, plus the fact
//! tables (votes, demo purchases) and the read-only track list. All writes
//! stamp `updated_at`; none retry. The ensure paths are read-then-insert:
//! a concurrent first boot can race, which the UNIQUE constraints turn into
//! a detectable duplicate error instead of a second row.

use crate::db::models::{Artist, DemoPurchase, Role, Track, Trend, User};
use crate::growth::Growth;
use crate::{Error, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Maximum length of `project_name` and `currency_name`
pub const NAME_MAX_CHARS: usize = 10;

/// Maximum length of the artist comment
pub const COMMENT_MAX_CHARS: usize = 60;

/// Draft defaults for a lazily created artist profile
pub const DEFAULT_PROJECT_NAME: &str = "NEW";
pub const DEFAULT_CURRENCY_NAME: &str = "MANTA";
pub const DEFAULT_ARTIST_COMMENT: &str = "private demos • unlock for stars";

/// Input for first-boot user creation
#[derive(Debug, Clone)]
pub struct NewUser {
    pub telegram_id: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
}

/// Artist profile edit, validated before any write
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ArtistPatch {
    pub project_name: String,
    pub currency_name: String,
    pub comment: String,
    pub private_link: String,
}

/// Client-side field enforcement, checked before the store is touched.
pub fn validate_artist_patch(patch: &ArtistPatch) -> Result<()> {
    if patch.project_name.trim().is_empty() || patch.currency_name.trim().is_empty() {
        return Err(Error::InvalidInput(
            "Project and currency names are required".to_string(),
        ));
    }
    if patch.project_name.chars().count() > NAME_MAX_CHARS
        || patch.currency_name.chars().count() > NAME_MAX_CHARS
    {
        return Err(Error::InvalidInput(format!(
            "Project and currency names are limited to {} characters",
            NAME_MAX_CHARS
        )));
    }
    if patch.comment.chars().count() > COMMENT_MAX_CHARS {
        return Err(Error::InvalidInput(format!(
            "Comment is limited to {} characters",
            COMMENT_MAX_CHARS
        )));
    }
    Ok(())
}

/// Look up a user by external identity.
pub async fn find_user_by_telegram_id(pool: &SqlitePool, telegram_id: &str) -> Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE telegram_id = ?")
        .bind(telegram_id)
        .fetch_optional(pool)
        .await
        .map_err(Error::read)
}

/// Create the user row for a first boot.
///
/// Bootstrap defaults: fan_level=1, fan_hp=15 (small head start), zero
/// stars, entry gate inactive. Failure here is fatal to boot.
pub async fn create_user(pool: &SqlitePool, new_user: &NewUser) -> Result<User> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO users
            (id, telegram_id, username, first_name, last_name, role,
             fan_level, fan_hp, stars_balance, entry_active, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, 1, 15, 0, 0, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&new_user.telegram_id)
    .bind(&new_user.username)
    .bind(&new_user.first_name)
    .bind(&new_user.last_name)
    .bind(new_user.role)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(Error::write)?;

    get_user(pool, &id).await
}

/// Fetch a user by primary key.
pub async fn get_user(pool: &SqlitePool, id: &str) -> Result<User> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Error::read)?
        .ok_or_else(|| Error::NotFound(format!("user {}", id)))
}

/// Persist a role change, stamping `updated_at`.
pub async fn update_user_role(pool: &SqlitePool, id: &str, role: Role) -> Result<User> {
    sqlx::query("UPDATE users SET role = ?, updated_at = ? WHERE id = ?")
        .bind(role)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await
        .map_err(Error::write)?;

    get_user(pool, id).await
}

/// Read-or-create the artist profile owned by a user.
pub async fn ensure_artist(pool: &SqlitePool, user: &User) -> Result<Artist> {
    let existing = sqlx::query_as::<_, Artist>("SELECT * FROM artists WHERE user_id = ?")
        .bind(&user.id)
        .fetch_optional(pool)
        .await
        .map_err(Error::read)?;

    if let Some(artist) = existing {
        return Ok(artist);
    }

    let id = Uuid::new_v4().to_string();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO artists
            (id, user_id, project_name, currency_name, comment, private_link,
             trust_score, level, hp, votes_total, supporters_count, trend,
             last_activity_at, updated_at)
        VALUES (?, ?, ?, ?, ?, '', 10, 1, 20, 0, 0, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&user.id)
    .bind(DEFAULT_PROJECT_NAME)
    .bind(DEFAULT_CURRENCY_NAME)
    .bind(DEFAULT_ARTIST_COMMENT)
    .bind(Trend::Flat)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(Error::write)?;

    get_artist(pool, &id).await
}

/// Fetch an artist by primary key.
pub async fn get_artist(pool: &SqlitePool, id: &str) -> Result<Artist> {
    sqlx::query_as::<_, Artist>("SELECT * FROM artists WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Error::read)?
        .ok_or_else(|| Error::NotFound(format!("artist {}", id)))
}

/// Chart query: artists ordered by trust score, capped.
pub async fn list_artists(pool: &SqlitePool, limit: i64) -> Result<Vec<Artist>> {
    sqlx::query_as::<_, Artist>("SELECT * FROM artists ORDER BY trust_score DESC LIMIT ?")
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Error::read)
}

/// Apply a validated profile edit, stamping `updated_at`.
pub async fn update_artist_profile(
    pool: &SqlitePool,
    id: &str,
    patch: &ArtistPatch,
) -> Result<Artist> {
    validate_artist_patch(patch)?;

    sqlx::query(
        r#"
        UPDATE artists
        SET project_name = ?, currency_name = ?, comment = ?, private_link = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(patch.project_name.trim())
    .bind(patch.currency_name.trim())
    .bind(patch.comment.trim())
    .bind(patch.private_link.trim())
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await
    .map_err(Error::write)?;

    get_artist(pool, id).await
}

/// Persist the growth counters produced by the growth engine.
///
/// Second write of the support action; the Vote fact is inserted first by
/// [`insert_vote`]. There is no transaction spanning the two.
pub async fn apply_growth(pool: &SqlitePool, id: &str, growth: &Growth) -> Result<Artist> {
    let now = Utc::now();
    sqlx::query(
        r#"
        UPDATE artists
        SET trust_score = ?, hp = ?, level = ?, votes_total = ?, trend = ?,
            last_activity_at = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(growth.trust_score)
    .bind(growth.hp)
    .bind(growth.level)
    .bind(growth.votes_total)
    .bind(growth.trend)
    .bind(now)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await
    .map_err(Error::write)?;

    get_artist(pool, id).await
}

/// Record one support action as an append-only Vote fact.
pub async fn insert_vote(pool: &SqlitePool, fan_user_id: &str, artist_id: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO votes (id, fan_user_id, artist_id, amount, created_at) VALUES (?, ?, ?, 1, ?)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(fan_user_id)
    .bind(artist_id)
    .bind(Utc::now())
    .execute(pool)
    .await
    .map_err(Error::write)?;
    Ok(())
}

/// Record a demo unlock.
///
/// Uniqueness per (user, artist) is enforced only by the store constraint;
/// a second unlock surfaces as [`Error::Duplicate`], which callers treat as
/// a soft success.
pub async fn insert_demo_purchase(
    pool: &SqlitePool,
    user_id: &str,
    artist_id: &str,
    stars_amount: i64,
) -> Result<DemoPurchase> {
    let id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO demo_purchases (id, user_id, artist_id, stars_amount, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(artist_id)
    .bind(stars_amount)
    .bind(Utc::now())
    .execute(pool)
    .await
    .map_err(Error::write)?;

    sqlx::query_as::<_, DemoPurchase>("SELECT * FROM demo_purchases WHERE id = ?")
        .bind(&id)
        .fetch_one(pool)
        .await
        .map_err(Error::read)
}

/// True iff the viewer holds a demo purchase for this artist.
pub async fn has_demo_purchase(pool: &SqlitePool, user_id: &str, artist_id: &str) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM demo_purchases WHERE user_id = ? AND artist_id = ?",
    )
    .bind(user_id)
    .bind(artist_id)
    .fetch_one(pool)
    .await
    .map_err(Error::read)?;
    Ok(count > 0)
}

/// Demo tracks of an artist, newest first. Seeded out-of-band.
pub async fn list_tracks(pool: &SqlitePool, artist_id: &str) -> Result<Vec<Track>> {
    sqlx::query_as::<_, Track>(
        "SELECT * FROM tracks WHERE artist_id = ? ORDER BY created_at DESC",
    )
    .bind(artist_id)
    .fetch_all(pool)
    .await
    .map_err(Error::read)
}

/// Fetch a track by primary key.
pub async fn get_track(pool: &SqlitePool, id: &str) -> Result<Track> {
    sqlx::query_as::<_, Track>("SELECT * FROM tracks WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Error::read)?
        .ok_or_else(|| Error::NotFound(format!("track {}", id)))
}

/// Count votes for an artist (reconciliation/debug aid).
pub async fn count_votes(pool: &SqlitePool, artist_id: &str) -> Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM votes WHERE artist_id = ?")
        .bind(artist_id)
        .fetch_one(pool)
        .await
        .map_err(Error::read)
}
