use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::{AppError, AppResult},
};

/// Server-side session values keyed by session id, stored as one JSONB object
/// per session. Expired sessions read as empty and are reset on the next write.
pub struct SessionStore<'a> {
    pool: &'a DbPool,
    ttl: Duration,
}

impl<'a> SessionStore<'a> {
    pub fn new(pool: &'a DbPool, ttl: Duration) -> Self {
        Self { pool, ttl }
    }

    pub async fn get(&self, session_id: Uuid, key: &str) -> AppResult<Option<Value>> {
        let row: Option<(Option<Value>,)> = sqlx::query_as(
            "SELECT data -> $2 FROM sessions WHERE id = $1 AND expires_at > NOW()",
        )
        .bind(session_id)
        .bind(key)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.and_then(|(value,)| value))
    }

    pub async fn set(&self, session_id: Uuid, key: &str, value: Value) -> AppResult<()> {
        let expires_at = expiry_after(Utc::now(), self.ttl)?;

        sqlx::query(
            r#"
            INSERT INTO sessions (id, data, expires_at)
            VALUES ($1, jsonb_build_object($2::text, $3::jsonb), $4)
            ON CONFLICT (id) DO UPDATE
            SET data = CASE
                    WHEN sessions.expires_at > NOW() THEN sessions.data
                    ELSE '{}'::jsonb
                END || jsonb_build_object($2::text, $3::jsonb),
                expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(session_id)
        .bind(key)
        .bind(value)
        .bind(expires_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Typed read; a missing or undecodable value falls back to `T::default()`.
    pub async fn load<T>(&self, session_id: Uuid, key: &str) -> AppResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let Some(raw) = self.get(session_id, key).await? else {
            return Ok(T::default());
        };
        match serde_json::from_value(raw) {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::warn!(error = %err, %session_id, key, "discarding malformed session value");
                Ok(T::default())
            }
        }
    }

    pub async fn save<T: Serialize>(&self, session_id: Uuid, key: &str, value: &T) -> AppResult<()> {
        let raw = serde_json::to_value(value).map_err(|err| AppError::Internal(err.into()))?;
        self.set(session_id, key, raw).await
    }

    pub async fn purge_expired(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

fn expiry_after(now: DateTime<Utc>, ttl: Duration) -> AppResult<DateTime<Utc>> {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("session ttl {ttl:?} is out of range")))
}
