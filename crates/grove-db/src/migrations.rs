//! Database migration runner.
//!
//! Embeds the SQL migration files at compile time. Applied versions are
//! tracked in `schema_migrations`, so `ALTER TABLE` migrations run exactly once.

use chrono::Utc;

use crate::error::DatabaseError;
use crate::helpers::ts;

/// Initial schema: 8 tables, 6 indexes.
const MIGRATION_001: &str = include_str!("../migrations/001_initial.sql");
/// Adds `measurements.update_id`.
const MIGRATION_002: &str = include_str!("../migrations/002_measurement_updates.sql");

/// Version that introduced the measurement → update link. Applying it to a
/// populated database triggers the startup reconciliation.
pub(crate) const MEASUREMENT_UPDATES: i64 = 2;

/// Highest known schema version.
pub(crate) const LATEST: i64 = MEASUREMENT_UPDATES;

const MIGRATIONS: [(i64, &str, &str); 2] = [
    (1, "001_initial", MIGRATION_001),
    (MEASUREMENT_UPDATES, "002_measurement_updates", MIGRATION_002),
];

/// Apply every migration with a version `<= up_to` that is not yet recorded.
///
/// Returns the versions applied by this call, in order.
pub(crate) async fn apply_pending(
    conn: &libsql::Connection,
    up_to: i64,
) -> Result<Vec<i64>, DatabaseError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER PRIMARY KEY,
            name       TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
        (),
    )
    .await
    .map_err(|e| DatabaseError::Migration(format!("schema_migrations: {e}")))?;

    let applied = applied_versions(conn).await?;
    let mut newly_applied = Vec::new();

    for &(version, name, sql) in &MIGRATIONS {
        if version > up_to || applied.contains(&version) {
            continue;
        }

        let tx = conn.transaction().await?;
        tx.execute_batch(sql)
            .await
            .map_err(|e| DatabaseError::Migration(format!("{name}: {e}")))?;
        tx.execute(
            "INSERT INTO schema_migrations (version, name, applied_at) VALUES (?1, ?2, ?3)",
            libsql::params![version, name, ts(&Utc::now())],
        )
        .await
        .map_err(|e| DatabaseError::Migration(format!("{name}: {e}")))?;
        tx.commit().await?;

        tracing::debug!(version, name, "applied migration");
        newly_applied.push(version);
    }

    Ok(newly_applied)
}

/// Versions recorded in `schema_migrations`.
pub(crate) async fn applied_versions(conn: &libsql::Connection) -> Result<Vec<i64>, DatabaseError> {
    let mut rows = conn
        .query("SELECT version FROM schema_migrations ORDER BY version", ())
        .await?;
    let mut versions = Vec::new();
    while let Some(row) = rows.next().await? {
        versions.push(row.get::<i64>(0)?);
    }
    Ok(versions)
}
