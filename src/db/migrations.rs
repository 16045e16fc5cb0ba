//! Database migrations and initialization.

use crate::recipes::Catalog;
use sqlx::sqlite::{SqliteConnection, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::info;

/// Initialize the SQLite database with one history table per trackable recipe.
pub async fn init_db(db_path: &str, catalog: &Catalog) -> Result<SqlitePool, sqlx::Error> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).ok();
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .after_connect(|conn, _meta| Box::pin(async move { configure_pragmas_conn(conn).await }))
        .connect(&format!("sqlite:{}?mode=rwc", db_path))
        .await?;

    run_migrations(&pool, catalog).await?;

    info!("Database initialized successfully at {}", db_path);
    Ok(pool)
}

/// DDL for one recipe history table. `table` must already be validated.
pub(crate) fn history_table_ddl(table: &str) -> [String; 2] {
    [
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp INTEGER NOT NULL,
                crafting_cost_g INTEGER NOT NULL,
                crafting_cost_s INTEGER NOT NULL,
                crafting_cost_c INTEGER NOT NULL,
                sell_g INTEGER NOT NULL,
                sell_s INTEGER NOT NULL,
                sell_c INTEGER NOT NULL
            )
            "#
        ),
        format!("CREATE INDEX IF NOT EXISTS idx_{table}_timestamp ON {table} (timestamp)"),
    ]
}

/// Table names are recipe slugs; only `[a-z0-9_]` is accepted so they can be
/// interpolated into SQL.
pub(crate) fn is_valid_table_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

async fn run_migrations(pool: &SqlitePool, catalog: &Catalog) -> Result<(), sqlx::Error> {
    info!("Running database migrations...");

    for recipe in catalog.trackable() {
        if !is_valid_table_name(recipe.slug) {
            return Err(sqlx::Error::Protocol(format!(
                "invalid table name: {}",
                recipe.slug
            )));
        }
        for statement in history_table_ddl(recipe.slug) {
            sqlx::query(&statement).execute(pool).await?;
        }
    }

    info!("Migrations completed successfully");
    Ok(())
}

/// Configure SQLite pragmas for optimal performance and reliability.
async fn configure_pragmas_conn(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    use sqlx::Row;

    // journal_mode returns the actual mode set; must use fetch to get result
    let row = sqlx::query("PRAGMA journal_mode = WAL")
        .fetch_one(&mut *conn)
        .await?;
    let journal_mode: String = row.get(0);
    tracing::debug!("SQLite journal_mode set to: {}", journal_mode);

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&mut *conn)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&mut *conn)
        .await?;

    Ok(())
}
