use grove_core::entities::Accolade;

use crate::error::DatabaseError;
use crate::helpers::{get_datetime, ts};

const TABLE: &str = "accolades";

fn row_to_accolade(row: &libsql::Row) -> Result<Accolade, DatabaseError> {
    Ok(Accolade {
        id: row.get::<i64>(0)?,
        specimen_id: row.get::<i64>(1)?,
        title: row.get::<String>(2)?,
        photo_id: row.get::<Option<i64>>(3)?,
        created_at: get_datetime(row, 4, TABLE, "created_at")?,
        updated_at: get_datetime(row, 5, TABLE, "updated_at")?,
    })
}

pub async fn list_accolades(conn: &libsql::Connection) -> Result<Vec<Accolade>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT id, specimen_id, title, photo_id, created_at, updated_at
             FROM accolades ORDER BY id",
            (),
        )
        .await?;
    let mut out = Vec::new();
    while let Some(row) = rows.next().await? {
        out.push(row_to_accolade(&row)?);
    }
    Ok(out)
}

pub async fn insert_accolade(conn: &libsql::Connection, a: &Accolade) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO accolades (id, specimen_id, title, photo_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        libsql::params![
            a.id,
            a.specimen_id,
            a.title.as_str(),
            a.photo_id,
            ts(&a.created_at),
            ts(&a.updated_at)
        ],
    )
    .await?;
    Ok(())
}
