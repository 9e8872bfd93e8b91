//! Submitted transactions database operations
//!
//! Persistent history of every transaction the send flow handed off,
//! updated as the confirmation worker observes status changes.

use chrono::{DateTime, Utc};
use rusqlite::Result as SqliteResult;
use serde::{Deserialize, Serialize};

use super::super::{Database, DbConn};
use crate::pending::PendingTxStatus;

pub fn create_tables(conn: &DbConn) -> SqliteResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS submitted_transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            uuid TEXT NOT NULL UNIQUE,
            hash TEXT NOT NULL,
            chain_id INTEGER NOT NULL,
            from_address TEXT NOT NULL,
            to_address TEXT NOT NULL,
            value TEXT NOT NULL,
            status TEXT NOT NULL,
            error TEXT,
            submitted_at TEXT NOT NULL,
            confirmed_at TEXT
        )",
        [],
    )?;
    Ok(())
}

/// A submitted transaction history row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedTransaction {
    pub id: i64,
    pub uuid: String,
    pub hash: String,
    pub chain_id: u64,
    pub from_address: String,
    pub to_address: String,
    pub value: String,
    pub status: PendingTxStatus,
    pub error: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

/// Data needed to record a new submission
pub struct RecordSubmittedTxRequest {
    pub uuid: String,
    pub hash: String,
    pub chain_id: u64,
    pub from_address: String,
    pub to_address: String,
    pub value: String,
}

fn row_to_tx(row: &rusqlite::Row<'_>) -> rusqlite::Result<SubmittedTransaction> {
    let status_str: String = row.get(7)?;
    let submitted_at_str: String = row.get(9)?;
    let confirmed_at_str: Option<String> = row.get(10)?;

    Ok(SubmittedTransaction {
        id: row.get(0)?,
        uuid: row.get(1)?,
        hash: row.get(2)?,
        chain_id: row.get::<_, i64>(3)? as u64,
        from_address: row.get(4)?,
        to_address: row.get(5)?,
        value: row.get(6)?,
        status: status_str.parse().unwrap_or(PendingTxStatus::Submitted),
        error: row.get(8)?,
        submitted_at: DateTime::parse_from_rfc3339(&submitted_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
        confirmed_at: confirmed_at_str.and_then(|s| {
            DateTime::parse_from_rfc3339(&s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        }),
    })
}

const TX_COLUMNS: &str = "id, uuid, hash, chain_id, from_address, to_address, value,
                          status, error, submitted_at, confirmed_at";

impl Database {
    /// Record a new submission
    pub fn record_submitted_tx(&self, req: RecordSubmittedTxRequest) -> SqliteResult<i64> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO submitted_transactions
             (uuid, hash, chain_id, from_address, to_address, value, status, submitted_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'submitted', ?7)",
            rusqlite::params![
                req.uuid,
                req.hash,
                req.chain_id as i64,
                req.from_address,
                req.to_address,
                req.value,
                now,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Update a submitted transaction's status by hash
    pub fn update_submitted_tx_status(
        &self,
        hash: &str,
        status: PendingTxStatus,
        error: Option<&str>,
    ) -> SqliteResult<bool> {
        let conn = self.conn();

        let confirmed_at = if status == PendingTxStatus::Confirmed {
            Some(Utc::now().to_rfc3339())
        } else {
            None
        };

        let rows = conn.execute(
            "UPDATE submitted_transactions
             SET status = ?1, error = ?2, confirmed_at = COALESCE(?3, confirmed_at)
             WHERE hash = ?4",
            rusqlite::params![status.to_string(), error, confirmed_at, hash],
        )?;

        Ok(rows > 0)
    }

    /// List submitted transactions with optional filters
    pub fn list_submitted_transactions(
        &self,
        status: Option<&str>,
        limit: Option<usize>,
    ) -> SqliteResult<Vec<SubmittedTransaction>> {
        let conn = self.conn();

        let mut sql = format!(
            "SELECT {} FROM submitted_transactions WHERE 1=1",
            TX_COLUMNS
        );
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(s) = status {
            sql.push_str(&format!(" AND status = ?{}", params.len() + 1));
            params.push(Box::new(s.to_string()));
        }

        sql.push_str(" ORDER BY submitted_at DESC");

        if let Some(l) = limit {
            sql.push_str(&format!(" LIMIT {}", l));
        }

        let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_refs.as_slice(), row_to_tx)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Get a single submitted transaction by hash
    pub fn get_submitted_tx(&self, hash: &str) -> SqliteResult<Option<SubmittedTransaction>> {
        let conn = self.conn();
        let sql = format!(
            "SELECT {} FROM submitted_transactions WHERE hash = ?1",
            TX_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        Ok(stmt.query_row([hash], row_to_tx).ok())
    }
}
