use grove_core::entities::Measurement;

use crate::error::DatabaseError;
use crate::helpers::{get_datetime, get_opt_datetime, get_opt_string, opt_ts, ts};

const TABLE: &str = "measurements";

fn row_to_measurement(row: &libsql::Row) -> Result<Measurement, DatabaseError> {
    Ok(Measurement {
        id: row.get::<i64>(0)?,
        specimen_id: row.get::<i64>(1)?,
        update_id: row.get::<Option<i64>>(2)?,
        measured_at: get_opt_datetime(row, 3, TABLE, "measured_at")?,
        height_cm: row.get::<Option<f64>>(4)?,
        trunk_diameter_cm: row.get::<Option<f64>>(5)?,
        canopy_width_cm: row.get::<Option<f64>>(6)?,
        notes: get_opt_string(row, 7)?,
        created_at: get_datetime(row, 8, TABLE, "created_at")?,
    })
}

pub async fn list_measurements(
    conn: &libsql::Connection,
) -> Result<Vec<Measurement>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT id, specimen_id, update_id, measured_at, height_cm, trunk_diameter_cm,
                    canopy_width_cm, notes, created_at
             FROM measurements ORDER BY id",
            (),
        )
        .await?;
    let mut out = Vec::new();
    while let Some(row) = rows.next().await? {
        out.push(row_to_measurement(&row)?);
    }
    Ok(out)
}

pub async fn insert_measurement(
    conn: &libsql::Connection,
    m: &Measurement,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO measurements (id, specimen_id, update_id, measured_at, height_cm,
                                   trunk_diameter_cm, canopy_width_cm, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        libsql::params![
            m.id,
            m.specimen_id,
            m.update_id,
            opt_ts(m.measured_at.as_ref()),
            m.height_cm,
            m.trunk_diameter_cm,
            m.canopy_width_cm,
            m.notes.as_deref(),
            ts(&m.created_at)
        ],
    )
    .await?;
    Ok(())
}
