//! Player and session queries

use cs2prac_sdk::SteamId;

use super::db::{steamid_key, unix_timestamp, Database, StoreError};

/// Persisted player row
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PlayerData {
    pub language: String,
    pub total_playtime_seconds: i64,
}

impl Database {
    /// Insert a player or refresh the name and last-seen time
    pub async fn upsert_player(&self, id: SteamId, name: &str) -> Result<(), StoreError> {
        let now = unix_timestamp();

        sqlx::query(
            r"
            INSERT INTO players (steamid, name, last_seen)
            VALUES (?, ?, ?)
            ON CONFLICT(steamid) DO UPDATE SET name = excluded.name, last_seen = excluded.last_seen
            ",
        )
        .bind(steamid_key(id))
        .bind(name)
        .bind(now)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Language and total playtime of a player
    pub async fn player_data(&self, id: SteamId) -> Result<Option<PlayerData>, StoreError> {
        let data = sqlx::query_as::<_, PlayerData>(
            "SELECT language, total_playtime_seconds FROM players WHERE steamid = ?",
        )
        .bind(steamid_key(id))
        .fetch_optional(self.pool())
        .await?;

        Ok(data)
    }

    /// Open a new session row
    pub async fn create_session(&self, id: SteamId) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO player_sessions (steamid, connect_time) VALUES (?, ?)")
            .bind(steamid_key(id))
            .bind(unix_timestamp())
            .execute(self.pool())
            .await?;

        Ok(())
    }

    /// Add seconds to the player's total and to the open session
    pub async fn add_playtime(&self, id: SteamId, seconds: i64) -> Result<(), StoreError> {
        let now = unix_timestamp();

        sqlx::query(
            "UPDATE players SET total_playtime_seconds = total_playtime_seconds + ?, last_seen = ? WHERE steamid = ?",
        )
        .bind(seconds)
        .bind(now)
        .bind(steamid_key(id))
        .execute(self.pool())
        .await?;

        sqlx::query(
            "UPDATE player_sessions SET session_playtime_seconds = session_playtime_seconds + ? WHERE steamid = ? AND disconnect_time IS NULL",
        )
        .bind(seconds)
        .bind(steamid_key(id))
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Close the open session with its final length
    pub async fn close_session(&self, id: SteamId, session_seconds: i64) -> Result<(), StoreError> {
        let now = unix_timestamp();

        sqlx::query(
            "UPDATE player_sessions SET disconnect_time = ?, session_playtime_seconds = ? WHERE steamid = ? AND disconnect_time IS NULL",
        )
        .bind(now)
        .bind(session_seconds)
        .bind(steamid_key(id))
        .execute(self.pool())
        .await?;

        sqlx::query("UPDATE players SET last_seen = ? WHERE steamid = ?")
            .bind(now)
            .bind(steamid_key(id))
            .execute(self.pool())
            .await?;

        Ok(())
    }

    pub async fn update_language(&self, id: SteamId, language: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE players SET language = ? WHERE steamid = ?")
            .bind(language)
            .bind(steamid_key(id))
            .execute(self.pool())
            .await?;

        Ok(())
    }

    /// Number of sessions ever opened by a player
    pub async fn session_count(&self, id: SteamId) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM player_sessions WHERE steamid = ?")
            .bind(steamid_key(id))
            .fetch_one(self.pool())
            .await?;

        Ok(count)
    }

    /// Number of known players
    pub async fn player_count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM players")
            .fetch_one(self.pool())
            .await?;

        Ok(count)
    }
}
