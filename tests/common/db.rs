//! Throwaway PostgreSQL databases for store tests.
//!
//! Each [`TestDb`] is a freshly created and migrated database on the server
//! named by `DATABASE_URL`. Tests that need one skip when that variable does
//! not point at PostgreSQL.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::{Connection, PgConnection, PgPool};
use url::Url;

use reviewdesk_api::database::{DatabaseManager, PgStore, Store};

pub struct TestDb {
    pub pool: PgPool,
    name: String,
    admin_url: String,
}

impl TestDb {
    pub async fn create() -> Result<Option<Self>> {
        let admin_url = match std::env::var("DATABASE_URL") {
            Ok(url) if url.starts_with("postgres://") || url.starts_with("postgresql://") => url,
            _ => {
                eprintln!("DATABASE_URL does not name a PostgreSQL server; skipping");
                return Ok(None);
            }
        };

        // Only [a-z0-9_], so safe to splice into DDL
        let name = format!("reviewdesk_test_{}", uuid::Uuid::new_v4().simple());

        let mut conn = PgConnection::connect(&admin_url)
            .await
            .context("failed to connect to DATABASE_URL")?;
        sqlx::query(&format!("CREATE DATABASE \"{}\"", name))
            .execute(&mut conn)
            .await
            .context("failed to create test database")?;
        conn.close().await?;

        let mut url = Url::parse(&admin_url)?;
        url.set_path(&name);
        let pool = PgPool::connect(url.as_str())
            .await
            .context("failed to connect to test database")?;
        DatabaseManager::migrate(&pool).await?;

        Ok(Some(Self { pool, name, admin_url }))
    }

    pub fn store(&self) -> Arc<dyn Store> {
        Arc::new(PgStore::new(self.pool.clone()))
    }

    /// Closes the pool and drops the database. Skipped when a test panics, in
    /// which case the database is left behind for inspection.
    pub async fn drop_database(self) -> Result<()> {
        self.pool.close().await;
        let mut conn = PgConnection::connect(&self.admin_url).await?;
        sqlx::query(&format!("DROP DATABASE IF EXISTS \"{}\"", self.name))
            .execute(&mut conn)
            .await?;
        conn.close().await?;
        Ok(())
    }
}
