use anyhow::Context;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use std::path::Path;

use crate::model::Course;

pub const CACHE_DB_FILE: &str = "coursebook.sqlite3";

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[derive(Debug, Clone)]
pub struct SnapshotMeta {
    pub course_id: String,
    pub title: String,
    pub updated_at: String,
}

/// Per-workspace snapshot cache. Holds the last tree the shell loaded for
/// each course so it can be re-opened without the backend. The payload is
/// the serialized course JSON; the checksum is verified on read so a
/// half-written or tampered row is rejected instead of rendered.
pub fn open_cache(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let conn = Connection::open(workspace.join(CACHE_DB_FILE))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS course_snapshots(
            course_id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            payload TEXT NOT NULL,
            checksum TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    Ok(conn)
}

pub fn snapshot_put(conn: &Connection, course: &Course) -> anyhow::Result<()> {
    let payload =
        serde_json::to_string(course).context("failed to serialize course snapshot")?;
    let checksum = sha256_hex(payload.as_bytes());
    let updated_at = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO course_snapshots(course_id, title, payload, checksum, updated_at)
         VALUES(?, ?, ?, ?, ?)
         ON CONFLICT(course_id) DO UPDATE SET
           title = excluded.title,
           payload = excluded.payload,
           checksum = excluded.checksum,
           updated_at = excluded.updated_at",
        (&course.id, &course.title, &payload, &checksum, &updated_at),
    )
    .context("failed to write course snapshot")?;
    Ok(())
}

pub fn snapshot_get(conn: &Connection, course_id: &str) -> anyhow::Result<Option<Course>> {
    let row: Option<(String, String)> = conn
        .query_row(
            "SELECT payload, checksum FROM course_snapshots WHERE course_id = ?",
            [course_id],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()
        .context("failed to read course snapshot")?;

    let Some((payload, checksum)) = row else {
        return Ok(None);
    };
    if sha256_hex(payload.as_bytes()) != checksum {
        anyhow::bail!("cached snapshot for course {} failed its checksum", course_id);
    }
    let course =
        serde_json::from_str(&payload).context("cached snapshot is not valid course JSON")?;
    Ok(Some(course))
}

pub fn snapshot_delete(conn: &Connection, course_id: &str) -> anyhow::Result<bool> {
    let removed = conn
        .execute(
            "DELETE FROM course_snapshots WHERE course_id = ?",
            [course_id],
        )
        .context("failed to delete course snapshot")?;
    Ok(removed > 0)
}

pub fn snapshot_list(conn: &Connection) -> anyhow::Result<Vec<SnapshotMeta>> {
    let mut stmt = conn.prepare(
        "SELECT course_id, title, updated_at
         FROM course_snapshots
         ORDER BY updated_at DESC",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(SnapshotMeta {
                course_id: row.get(0)?,
                title: row.get(1)?,
                updated_at: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
