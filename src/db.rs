//! Pool construction and schema migrations for the single-file meal store.
//!
//! Migrations are an ordered list of idempotent steps tracked in a
//! `schema_version` table. Each step checks whether it has already been
//! applied before touching anything, so `initialize` is safe to call on
//! every process start and never destroys existing rows. Steps are
//! additive only; numeric columns added after the fact carry `DEFAULT 0`
//! so old rows read back as zero.

use std::str::FromStr;

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tracing::{info, warn};

/// Bump when adding a migration step below.
const CURRENT_SCHEMA_VERSION: i32 = 2;

pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("invalid DATABASE_URL '{database_url}'"))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .context("connect to database")?;
    Ok(pool)
}

/// Bring the schema up to date. Idempotent; call on every start.
pub async fn initialize(pool: &SqlitePool) -> anyhow::Result<()> {
    ensure_version_table(pool).await?;

    let current = schema_version(pool).await?;
    if current == CURRENT_SCHEMA_VERSION {
        info!("database schema is up to date (v{current})");
        return Ok(());
    }
    if current > CURRENT_SCHEMA_VERSION {
        warn!(
            "database schema version ({current}) is newer than this build ({CURRENT_SCHEMA_VERSION}); leaving it alone"
        );
        return Ok(());
    }

    info!("running database migrations: v{current} -> v{CURRENT_SCHEMA_VERSION}");

    if current < 1 {
        migrate_v1(pool).await?;
        set_schema_version(pool, 1).await?;
        info!("migration v1 applied");
    }
    if current < 2 {
        migrate_v2(pool).await?;
        set_schema_version(pool, 2).await?;
        info!("migration v2 applied");
    }

    Ok(())
}

async fn ensure_version_table(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn schema_version(pool: &SqlitePool) -> anyhow::Result<i32> {
    let version: Option<i32> =
        sqlx::query_scalar("SELECT version FROM schema_version ORDER BY version DESC LIMIT 1")
            .fetch_optional(pool)
            .await?;
    Ok(version.unwrap_or(0))
}

async fn set_schema_version(pool: &SqlitePool, version: i32) -> anyhow::Result<()> {
    sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
        .bind(version)
        .execute(pool)
        .await?;
    Ok(())
}

async fn column_exists(pool: &SqlitePool, table: &str, column: &str) -> anyhow::Result<bool> {
    let count: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM pragma_table_info('{table}') WHERE name = ?"
    ))
    .bind(column)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// v1: the meals table as first shipped.
async fn migrate_v1(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS meals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            log_date TEXT NOT NULL,
            meal_name TEXT NOT NULL,
            logged_at TEXT NOT NULL,
            serving TEXT,
            calories REAL NOT NULL,
            protein_g REAL NOT NULL,
            carbs_g REAL NOT NULL,
            fat_g REAL NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_meals_log_date ON meals(log_date)")
        .execute(pool)
        .await?;
    Ok(())
}

/// v2: fiber and sugar columns, backfilled to 0 for rows logged before
/// the estimator started reporting them.
async fn migrate_v2(pool: &SqlitePool) -> anyhow::Result<()> {
    for column in ["fiber_g", "sugar_g"] {
        if column_exists(pool, "meals", column).await? {
            info!("column {column} already present - skipping");
            continue;
        }
        sqlx::query(&format!(
            "ALTER TABLE meals ADD COLUMN {column} REAL NOT NULL DEFAULT 0"
        ))
        .execute(pool)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite")
}
