use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::HistoryRecord;

pub fn insert_history(conn: &Connection, record: &HistoryRecord) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO history (id, ts, payload, response) VALUES (?1, ?2, ?3, ?4)",
        params![
            record.id.to_string(),
            record.ts.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            serde_json::to_string(&record.payload)?,
            serde_json::to_string(&record.response)?,
        ],
    )?;
    Ok(())
}

/// Most recent first. `None` returns every row.
pub fn list_history(
    conn: &Connection,
    limit: Option<usize>,
) -> Result<Vec<HistoryRecord>, DatabaseError> {
    let limit = limit.map_or(-1, |l| l as i64);
    let mut stmt = conn.prepare(
        "SELECT id, ts, payload, response FROM history
         ORDER BY seq DESC
         LIMIT ?1",
    )?;
    let rows = stmt
        .query_map(params![limit], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id, ts, payload, response)| row_to_record(&id, &ts, &payload, &response))
        .collect()
}

/// Keep only the `keep` most recent rows. Returns the number deleted.
pub fn prune_history(conn: &Connection, keep: usize) -> Result<usize, DatabaseError> {
    let deleted = conn.execute(
        "DELETE FROM history WHERE seq NOT IN (
             SELECT seq FROM history ORDER BY seq DESC LIMIT ?1
         )",
        params![keep as i64],
    )?;
    Ok(deleted)
}

pub fn count_history(conn: &Connection) -> Result<usize, DatabaseError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM history", [], |row| row.get(0))?;
    Ok(count as usize)
}

pub fn clear_history(conn: &Connection) -> Result<usize, DatabaseError> {
    Ok(conn.execute("DELETE FROM history", [])?)
}

fn row_to_record(
    id: &str,
    ts: &str,
    payload: &str,
    response: &str,
) -> Result<HistoryRecord, DatabaseError> {
    let id = Uuid::parse_str(id).map_err(|_| DatabaseError::InvalidValue {
        field: "id".into(),
        value: id.into(),
    })?;
    let ts = DateTime::parse_from_rfc3339(ts)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| DatabaseError::InvalidValue {
            field: "ts".into(),
            value: ts.into(),
        })?;
    Ok(HistoryRecord {
        id,
        ts,
        payload: serde_json::from_str(payload)?,
        response: serde_json::from_str(response)?,
    })
}
