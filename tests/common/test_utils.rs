#![allow(dead_code)]

use airport_service::db::apply_schema;
use dotenv::dotenv;
use once_cell::sync::Lazy;
use sqlx::mysql::MySqlPool as Pool;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::Error;
use std::env;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::OnceCell;

// One database per test binary, shared by all of its tests
static DB_NAME: Lazy<String> = Lazy::new(|| {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    format!("airport_test_{}_{}", timestamp, rand::random::<u16>())
});

static SCHEMA_READY: OnceCell<()> = OnceCell::const_new();

pub struct TestDb;

fn admin_url() -> Option<String> {
    dotenv().ok();
    env::var("ADMIN_DATABASE_URL").ok()
}

// Server part of the admin url, without any database path
fn base_url(db_url: &str) -> String {
    db_url.split('/').take(3).collect::<Vec<&str>>().join("/")
}

async fn connect(url: &str) -> Result<Pool, Error> {
    MySqlPoolOptions::new().max_connections(10).connect(url).await
}

impl TestDb {
    /// Pool on this binary's test database, creating it on first use.
    ///
    /// Returns `None` when ADMIN_DATABASE_URL is not set; callers skip.
    /// Every test gets its own pool: a pool is tied to the runtime of the
    /// `#[tokio::test]` that opened it.
    pub async fn get_instance() -> Result<Option<Pool>, Error> {
        let Some(db_url) = admin_url() else {
            println!("ADMIN_DATABASE_URL not set, skipping database test");
            return Ok(None);
        };
        let base = base_url(&db_url);

        SCHEMA_READY
            .get_or_try_init(|| async {
                println!("Creating test database {}", *DB_NAME);
                let admin_pool = connect(&base).await?;
                sqlx::query(&format!("CREATE DATABASE IF NOT EXISTS {}", *DB_NAME))
                    .execute(&admin_pool)
                    .await?;
                admin_pool.close().await;

                let pool = connect(&format!("{}/{}", base, *DB_NAME)).await?;
                apply_schema(&pool).await?;
                pool.close().await;
                Ok::<(), Error>(())
            })
            .await?;

        Ok(Some(connect(&format!("{}/{}", base, *DB_NAME)).await?))
    }

    // Drops the database at process exit, from a #[dtor], outside any runtime
    pub fn cleanup_database_sync() -> Result<(), Error> {
        if SCHEMA_READY.get().is_none() {
            return Ok(());
        }
        let Some(db_url) = admin_url() else {
            return Ok(());
        };

        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(async {
            println!("Dropping database: {}", *DB_NAME);
            let admin_pool = connect(&base_url(&db_url)).await?;
            sqlx::query(&format!("DROP DATABASE IF EXISTS {}", *DB_NAME))
                .execute(&admin_pool)
                .await?;
            Ok(())
        })
    }
}

/// Short unique name; reference names are capped at 25 characters
pub fn unique_name(prefix: &str) -> String {
    format!("{}{}", prefix, rand::random::<u32>() % 100_000_000)
}

/// Skips the test when no database is configured
#[allow(unused_macros)]
macro_rules! require_db {
    ($ctx:expr) => {
        match &$ctx.pool {
            Some(pool) => pool.clone(),
            None => return Ok(()),
        }
    };
}
