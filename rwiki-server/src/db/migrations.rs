//! Schema setup for the two content tables.
//!
//! Idempotent CREATE IF NOT EXISTS statements run at startup; there is
//! no versioned migration history, the schema is small enough that
//! additive changes land here directly.

use sqlx::SqlitePool;

use super::repos::DbError;

/// Create tables and indexes if they do not exist yet.
pub async fn run(pool: &SqlitePool) -> Result<(), DbError> {
    tracing::info!("running schema migrations");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sites (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            city TEXT,
            url TEXT NOT NULL,
            description TEXT NOT NULL,
            category TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL DEFAULT 'pending',
            featured INTEGER NOT NULL DEFAULT 0,
            display_order INTEGER NOT NULL DEFAULT 0,
            submitted_at TEXT NOT NULL DEFAULT (DATETIME('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS talents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            handle TEXT NOT NULL,
            instagram TEXT NOT NULL,
            description TEXT NOT NULL,
            category TEXT NOT NULL DEFAULT '',
            image TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL DEFAULT 'pending',
            display_order INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (DATETIME('now')),
            updated_at TEXT NOT NULL DEFAULT (DATETIME('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    create_indexes(pool).await?;

    tracing::info!("schema migrations complete");
    Ok(())
}

/// Indexes for the hot filters (status, category). Shared with the
/// `optimize` maintenance command.
pub async fn create_indexes(pool: &SqlitePool) -> Result<(), DbError> {
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_sites_status ON sites(status)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_sites_category ON sites(category)")
        .execute(pool)
        .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_sites_status_category ON sites(status, category)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_talents_status ON talents(status)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_talents_category ON talents(category)")
        .execute(pool)
        .await?;

    Ok(())
}
