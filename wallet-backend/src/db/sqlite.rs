//! SQLite persistence behind an r2d2 pool.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use super::tables;

pub type DbConn = r2d2::PooledConnection<SqliteConnectionManager>;

pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Open (or create) the database at `path` and ensure the schema exists.
    /// `:memory:` gives an in-memory database for tests.
    pub fn new(path: &str) -> Result<Self, String> {
        let manager = if path == ":memory:" {
            SqliteConnectionManager::memory()
        } else {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| format!("Failed to create database directory: {}", e))?;
                }
            }
            SqliteConnectionManager::file(path)
        };

        // A single connection for in-memory databases: each pooled
        // connection would otherwise see its own empty database.
        let max_size = if path == ":memory:" { 1 } else { 8 };
        let pool = Pool::builder()
            .max_size(max_size)
            .build(manager)
            .map_err(|e| format!("Failed to create connection pool: {}", e))?;

        let db = Self { pool };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<(), String> {
        let conn = self.conn();
        tables::notifications::create_tables(&conn).map_err(|e| e.to_string())?;
        tables::transactions::create_tables(&conn).map_err(|e| e.to_string())?;
        Ok(())
    }

    pub(crate) fn conn(&self) -> DbConn {
        self.pool.get().expect("database pool exhausted")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_backed_database_persists_across_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("wallet.db");
        let path = path.to_str().expect("utf-8 path");

        {
            let db = Database::new(path).expect("create db");
            db.mark_feature_announcements_read(&["seen".to_string()])
                .unwrap();
        }

        let db = Database::new(path).expect("reopen db");
        let ids = db.list_feature_announcement_read_ids().unwrap();
        assert_eq!(ids, vec!["seen".to_string()]);
    }

    #[test]
    fn missing_parent_directories_are_created() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/dbs/wallet.db");
        let db = Database::new(path.to_str().expect("utf-8 path"));
        assert!(db.is_ok());
    }
}
