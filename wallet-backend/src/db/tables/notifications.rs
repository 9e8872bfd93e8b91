//! Notification read-state database operations
//!
//! Feature announcements have no server-side read flag, so the ids the user
//! has read are persisted locally and overlaid during normalization.

use chrono::Utc;
use rusqlite::Result as SqliteResult;

use super::super::{Database, DbConn};

pub fn create_tables(conn: &DbConn) -> SqliteResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS feature_announcement_reads (
            id TEXT PRIMARY KEY,
            read_at TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

impl Database {
    /// Record feature-announcement ids as read. Already-read ids are kept
    /// with their original read time.
    pub fn mark_feature_announcements_read(&self, ids: &[String]) -> SqliteResult<usize> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();

        let mut inserted = 0;
        for id in ids {
            inserted += conn.execute(
                "INSERT OR IGNORE INTO feature_announcement_reads (id, read_at) VALUES (?1, ?2)",
                rusqlite::params![id, now],
            )?;
        }
        Ok(inserted)
    }

    /// All feature-announcement ids the user has read.
    pub fn list_feature_announcement_read_ids(&self) -> SqliteResult<Vec<String>> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare("SELECT id FROM feature_announcement_reads ORDER BY read_at")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }
}
