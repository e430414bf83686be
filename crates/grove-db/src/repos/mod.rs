//! Per-kind repositories: row decoding, read-all and insert.
//!
//! Every function takes a `&libsql::Connection` so it can run either on the
//! plain connection or inside a `libsql::Transaction` (which derefs to one).

pub mod accolade;
pub mod graveyard;
pub mod measurement;
pub mod notification;
pub mod photo;
pub mod species;
pub mod specimen;
pub mod update;

use grove_core::enums::EntityKind;

use crate::error::DatabaseError;

/// Delete every row of one kind. Returns the number of rows removed.
pub async fn delete_all(conn: &libsql::Connection, kind: EntityKind) -> Result<u64, DatabaseError> {
    let sql = format!("DELETE FROM {}", kind.table());
    Ok(conn.execute(&sql, ()).await?)
}

/// Count rows of one kind.
pub async fn count(conn: &libsql::Connection, kind: EntityKind) -> Result<u64, DatabaseError> {
    let sql = format!("SELECT COUNT(*) FROM {}", kind.table());
    let mut rows = conn.query(&sql, ()).await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    let n = row.get::<i64>(0)?;
    u64::try_from(n).map_err(|e| DatabaseError::Query(format!("negative count: {e}")))
}
