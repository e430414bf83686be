use grove_core::entities::Specimen;

use crate::error::DatabaseError;
use crate::helpers::{get_datetime, get_opt_date, get_opt_string, opt_date, ts};

const TABLE: &str = "specimens";

fn row_to_specimen(row: &libsql::Row) -> Result<Specimen, DatabaseError> {
    Ok(Specimen {
        id: row.get::<i64>(0)?,
        name: row.get::<String>(1)?,
        species_id: row.get::<Option<i64>>(2)?,
        acquisition_date: get_opt_date(row, 3, TABLE, "acquisition_date")?,
        origin_date: get_opt_date(row, 4, TABLE, "origin_date")?,
        location: get_opt_string(row, 5)?,
        notes: get_opt_string(row, 6)?,
        development_stage: get_opt_string(row, 7)?,
        status: row.get::<String>(8)?,
        created_at: get_datetime(row, 9, TABLE, "created_at")?,
        updated_at: get_datetime(row, 10, TABLE, "updated_at")?,
    })
}

pub async fn list_specimens(conn: &libsql::Connection) -> Result<Vec<Specimen>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT id, name, species_id, acquisition_date, origin_date, location, notes,
                    development_stage, status, created_at, updated_at
             FROM specimens ORDER BY id",
            (),
        )
        .await?;
    let mut out = Vec::new();
    while let Some(row) = rows.next().await? {
        out.push(row_to_specimen(&row)?);
    }
    Ok(out)
}

pub async fn insert_specimen(conn: &libsql::Connection, s: &Specimen) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO specimens (id, name, species_id, acquisition_date, origin_date, location,
                                notes, development_stage, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        libsql::params![
            s.id,
            s.name.as_str(),
            s.species_id,
            opt_date(s.acquisition_date.as_ref()),
            opt_date(s.origin_date.as_ref()),
            s.location.as_deref(),
            s.notes.as_deref(),
            s.development_stage.as_deref(),
            s.status.as_str(),
            ts(&s.created_at),
            ts(&s.updated_at)
        ],
    )
    .await?;
    Ok(())
}
