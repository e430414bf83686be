use grove_core::entities::Update;

use crate::error::DatabaseError;
use crate::helpers::{get_datetime, get_opt_datetime, get_opt_string, opt_ts, ts};

const TABLE: &str = "updates";

fn row_to_update(row: &libsql::Row) -> Result<Update, DatabaseError> {
    Ok(Update {
        id: row.get::<i64>(0)?,
        specimen_id: row.get::<i64>(1)?,
        title: row.get::<String>(2)?,
        description: get_opt_string(row, 3)?,
        performed_at: get_opt_datetime(row, 4, TABLE, "performed_at")?,
        created_at: get_datetime(row, 5, TABLE, "created_at")?,
        updated_at: get_datetime(row, 6, TABLE, "updated_at")?,
    })
}

pub async fn list_updates(conn: &libsql::Connection) -> Result<Vec<Update>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT id, specimen_id, title, description, performed_at, created_at, updated_at
             FROM updates ORDER BY id",
            (),
        )
        .await?;
    let mut out = Vec::new();
    while let Some(row) = rows.next().await? {
        out.push(row_to_update(&row)?);
    }
    Ok(out)
}

pub async fn insert_update(conn: &libsql::Connection, u: &Update) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO updates (id, specimen_id, title, description, performed_at, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        libsql::params![
            u.id,
            u.specimen_id,
            u.title.as_str(),
            u.description.as_deref(),
            opt_ts(u.performed_at.as_ref()),
            ts(&u.created_at),
            ts(&u.updated_at)
        ],
    )
    .await?;
    Ok(())
}
