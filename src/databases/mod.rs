use anyhow::{Context, Result};
use log::{info, warn};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use std::{fs, path::Path};

pub mod users;

fn load_schema() -> Result<String> {
    let schema_path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("databases/users")
        .join("schema.sql");
    fs::read_to_string(&schema_path)
        .with_context(|| format!("Failed to read schema file: {:?}", schema_path))
}

async fn check_tables_exist(pool: &PgPool, tables: &[&str]) -> Result<bool> {
    for &table in tables {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )",
        )
        .bind(table)
        .fetch_one(pool)
        .await?;

        if !exists.0 {
            info!("table '{}' does not exist yet", table);
            return Ok(false);
        }
    }
    Ok(true)
}

/// Builds the connection pool and provisions the schema when needed.
///
/// The pool is lazy: a database that is unreachable at startup surfaces as a
/// per-request connection error instead of preventing boot.
pub async fn setup_backend(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect_lazy(database_url)
        .context("Invalid DATABASE_URL")?;

    if let Err(e) = provision_schema(&pool).await {
        warn!("schema provisioning deferred: {:#}", e);
    }

    Ok(pool)
}

async fn provision_schema(pool: &PgPool) -> Result<()> {
    if check_tables_exist(pool, &["users"]).await? {
        return Ok(());
    }

    let schema_sql = load_schema()?;
    pool.execute(schema_sql.as_str())
        .await
        .context("Failed to execute schema SQL")?;
    info!("users table created");
    Ok(())
}
