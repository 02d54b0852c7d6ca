//! Connection pool construction and embedded migrations.
//!
//! The daemon resolves one database URL from its configuration and opens
//! a single shared pool here; every table-backed resource queries through
//! that pool.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

use crate::error::StorageError;

/// Connection settings for the `SQLite` storage adapter.
pub struct Config {
    /// `SQLite` connection URL (e.g. `sqlite:backsync.db` or `sqlite::memory:`).
    pub database_url: String,
}

impl Config {
    /// Read configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `BACKSYNC_DATABASE_URL` is not set.
    pub fn from_env() -> Result<Self, std::env::VarError> {
        Ok(Self {
            database_url: std::env::var("BACKSYNC_DATABASE_URL")?,
        })
    }

    /// Open the pool and bring the schema up to date.
    ///
    /// Creates the database file if missing and applies the migrations
    /// embedded from `migrations/` at compile time, demo tables included.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the URL does not parse, the connection
    /// fails, or a migration cannot be applied.
    pub async fn build(self) -> Result<Database, StorageError> {
        let options = SqliteConnectOptions::from_str(&self.database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Database { pool })
    }
}

/// Handle on the migrated connection pool.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Borrow the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use super::*;

    async fn memory_db() -> Database {
        Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap()
    }

    async fn column_names(db: &Database, table: &str) -> Vec<String> {
        sqlx::query(&format!("PRAGMA table_info({table})"))
            .fetch_all(db.pool())
            .await
            .unwrap()
            .iter()
            .map(|row| row.get("name"))
            .collect()
    }

    #[tokio::test]
    async fn should_create_demo_tables_when_building_memory_db() {
        let db = memory_db().await;

        assert_eq!(
            column_names(&db, "tasks").await,
            ["id", "name", "done", "priority", "created_at"]
        );
        assert_eq!(column_names(&db, "notes").await, ["id", "title", "body"]);
    }

    #[tokio::test]
    async fn should_record_applied_migrations() {
        let db = memory_db().await;

        let versions: Vec<i64> = sqlx::query_scalar(
            "SELECT version FROM _sqlx_migrations WHERE success = 1 ORDER BY version",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        assert_eq!(versions, [1]);
    }
}
