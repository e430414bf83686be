use grove_core::entities::Notification;

use crate::error::DatabaseError;
use crate::helpers::{get_bool, get_datetime, get_opt_datetime, get_opt_string, opt_ts, ts};

const TABLE: &str = "notifications";

fn row_to_notification(row: &libsql::Row) -> Result<Notification, DatabaseError> {
    Ok(Notification {
        id: row.get::<i64>(0)?,
        specimen_id: row.get::<Option<i64>>(1)?,
        title: row.get::<String>(2)?,
        message: row.get::<String>(3)?,
        category: get_opt_string(row, 4)?,
        due_at: get_opt_datetime(row, 5, TABLE, "due_at")?,
        read: get_bool(row, 6)?,
        created_at: get_datetime(row, 7, TABLE, "created_at")?,
    })
}

pub async fn list_notifications(
    conn: &libsql::Connection,
) -> Result<Vec<Notification>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT id, specimen_id, title, message, category, due_at, read, created_at
             FROM notifications ORDER BY id",
            (),
        )
        .await?;
    let mut out = Vec::new();
    while let Some(row) = rows.next().await? {
        out.push(row_to_notification(&row)?);
    }
    Ok(out)
}

pub async fn insert_notification(
    conn: &libsql::Connection,
    n: &Notification,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO notifications (id, specimen_id, title, message, category, due_at, read, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        libsql::params![
            n.id,
            n.specimen_id,
            n.title.as_str(),
            n.message.as_str(),
            n.category.as_deref(),
            opt_ts(n.due_at.as_ref()),
            i64::from(n.read),
            ts(&n.created_at)
        ],
    )
    .await?;
    Ok(())
}
