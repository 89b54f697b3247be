// src/database.rs
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use crate::error::AppError;
use crate::storage::KeyValueStore;

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS local_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"#,
    )
    .execute(&pool)
    .await?;

    Ok(pool)
}

/// Key/value state kept in Postgres so counters survive restarts.
#[derive(Clone)]
pub struct PgKeyValueStore {
    db_pool: PgPool,
}

impl PgKeyValueStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl KeyValueStore for PgKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM local_state WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.db_pool)
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"INSERT INTO local_state (key, value) VALUES ($1, $2)
               ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()"#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.db_pool)
        .await?;
        Ok(())
    }

    // Single upsert, so two clients cannot both read the same stale count
    async fn increment(&self, key: &str) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, String>(
            r#"INSERT INTO local_state (key, value) VALUES ($1, '1')
               ON CONFLICT (key) DO UPDATE
               SET value = (COALESCE(NULLIF(local_state.value, ''), '0')::BIGINT + 1)::TEXT,
                   updated_at = NOW()
               RETURNING value"#,
        )
        .bind(key)
        .fetch_one(&self.db_pool)
        .await?;

        count
            .parse::<i64>()
            .map_err(|e| AppError::storage(format!("Counter {key} is not an integer: {e}")))
    }
}
