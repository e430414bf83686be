use grove_core::entities::Species;

use crate::error::DatabaseError;
use crate::helpers::{get_datetime, get_opt_string, ts};

const TABLE: &str = "species";

fn row_to_species(row: &libsql::Row) -> Result<Species, DatabaseError> {
    Ok(Species {
        id: row.get::<i64>(0)?,
        common_name: row.get::<String>(1)?,
        scientific_name: get_opt_string(row, 2)?,
        description: get_opt_string(row, 3)?,
        care_instructions: get_opt_string(row, 4)?,
        tree_count: row.get::<i64>(5)?,
        created_at: get_datetime(row, 6, TABLE, "created_at")?,
        updated_at: get_datetime(row, 7, TABLE, "updated_at")?,
    })
}

pub async fn list_species(conn: &libsql::Connection) -> Result<Vec<Species>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT id, common_name, scientific_name, description, care_instructions,
                    tree_count, created_at, updated_at
             FROM species ORDER BY id",
            (),
        )
        .await?;
    let mut out = Vec::new();
    while let Some(row) = rows.next().await? {
        out.push(row_to_species(&row)?);
    }
    Ok(out)
}

pub async fn insert_species(conn: &libsql::Connection, s: &Species) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO species (id, common_name, scientific_name, description, care_instructions,
                              tree_count, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        libsql::params![
            s.id,
            s.common_name.as_str(),
            s.scientific_name.as_deref(),
            s.description.as_deref(),
            s.care_instructions.as_deref(),
            s.tree_count,
            ts(&s.created_at),
            ts(&s.updated_at)
        ],
    )
    .await?;
    Ok(())
}
