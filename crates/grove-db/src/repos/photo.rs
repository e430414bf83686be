use grove_core::entities::Photo;

use crate::error::DatabaseError;
use crate::helpers::{get_bool, get_datetime, get_opt_datetime, get_opt_string, opt_ts, ts};

const TABLE: &str = "photos";

fn row_to_photo(row: &libsql::Row) -> Result<Photo, DatabaseError> {
    Ok(Photo {
        id: row.get::<i64>(0)?,
        specimen_id: row.get::<i64>(1)?,
        update_id: row.get::<Option<i64>>(2)?,
        description: get_opt_string(row, 3)?,
        taken_at: get_opt_datetime(row, 4, TABLE, "taken_at")?,
        full_path: row.get::<String>(5)?,
        thumbnail_path: row.get::<String>(6)?,
        is_primary: get_bool(row, 7)?,
        created_at: get_datetime(row, 8, TABLE, "created_at")?,
    })
}

pub async fn list_photos(conn: &libsql::Connection) -> Result<Vec<Photo>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT id, specimen_id, update_id, description, taken_at, full_path,
                    thumbnail_path, is_primary, created_at
             FROM photos ORDER BY id",
            (),
        )
        .await?;
    let mut out = Vec::new();
    while let Some(row) = rows.next().await? {
        out.push(row_to_photo(&row)?);
    }
    Ok(out)
}

pub async fn insert_photo(conn: &libsql::Connection, p: &Photo) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO photos (id, specimen_id, update_id, description, taken_at, full_path,
                             thumbnail_path, is_primary, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        libsql::params![
            p.id,
            p.specimen_id,
            p.update_id,
            p.description.as_deref(),
            opt_ts(p.taken_at.as_ref()),
            p.full_path.as_str(),
            p.thumbnail_path.as_str(),
            i64::from(p.is_primary),
            ts(&p.created_at)
        ],
    )
    .await?;
    Ok(())
}
