use grove_core::entities::GraveyardEntry;

use crate::error::DatabaseError;
use crate::helpers::{get_datetime, get_opt_string, ts};

const TABLE: &str = "graveyard_entries";

fn row_to_entry(row: &libsql::Row) -> Result<GraveyardEntry, DatabaseError> {
    Ok(GraveyardEntry {
        id: row.get::<i64>(0)?,
        specimen_id: row.get::<i64>(1)?,
        category: row.get::<String>(2)?,
        note: get_opt_string(row, 3)?,
        moved_at: get_datetime(row, 4, TABLE, "moved_at")?,
    })
}

pub async fn list_graveyard_entries(
    conn: &libsql::Connection,
) -> Result<Vec<GraveyardEntry>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT id, specimen_id, category, note, moved_at FROM graveyard_entries ORDER BY id",
            (),
        )
        .await?;
    let mut out = Vec::new();
    while let Some(row) = rows.next().await? {
        out.push(row_to_entry(&row)?);
    }
    Ok(out)
}

pub async fn insert_graveyard_entry(
    conn: &libsql::Connection,
    g: &GraveyardEntry,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO graveyard_entries (id, specimen_id, category, note, moved_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        libsql::params![
            g.id,
            g.specimen_id,
            g.category.as_str(),
            g.note.as_deref(),
            ts(&g.moved_at)
        ],
    )
    .await?;
    Ok(())
}
