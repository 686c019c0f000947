//! Shared SQLite connection handle.
//!
//! The whole server runs on a single connection, opened once at startup and
//! injected into both services. The embedded schema is applied idempotently
//! on every open, so a fresh database file is usable immediately.

use crate::error::StoreResult;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// The embedded schema, applied with `CREATE TABLE IF NOT EXISTS`.
const SCHEMA: &str = include_str!("schema.sql");

/// Handle to the single shared database connection.
///
/// Cloning is cheap; all clones refer to the same connection. The mutex
/// serializes statements so the handle stays `Send + Sync` for the async
/// edge, which hops onto a blocking thread before touching it.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database file at `path` and apply the schema.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Open an in-memory database with the schema applied. Used by tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Database {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` with exclusive access to the connection.
    ///
    /// A poisoned mutex is recovered rather than propagated: the connection
    /// itself carries no invariant a panicked statement could have broken.
    pub fn with_conn<T>(&self, f: impl FnOnce(&mut Connection) -> T) -> T {
        let mut conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut conn)
    }
}

/// Sort direction for caller-supplied ordering.
///
/// Anything that is not literally "DESC" (case-insensitive) normalizes to
/// ascending; callers can never inject text into the ORDER BY clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Normalize a caller-supplied direction string.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("DESC") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    /// The fixed SQL keyword for this direction.
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory_applies_schema() {
        let db = Database::open_in_memory().unwrap();
        let tables: Vec<String> = db.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
                .unwrap();
            stmt.query_map([], |row| row.get(0))
                .unwrap()
                .collect::<Result<_, _>>()
                .unwrap()
        });
        assert!(tables.contains(&"contacts".to_string()));
        assert!(tables.contains(&"events".to_string()));
        assert!(tables.contains(&"event_contacts".to_string()));
    }

    #[test]
    fn test_open_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agenda.db");

        let db = Database::open(&path).unwrap();
        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO contacts (name, created_at, updated_at) VALUES ('Ada', 0, 0)",
                [],
            )
            .unwrap();
        });
        drop(db);

        // Reopening must apply the schema without clobbering existing rows.
        let db = Database::open(&path).unwrap();
        let count: i64 = db.with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))
                .unwrap()
        });
        assert_eq!(count, 1);
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!(SortOrder::parse("DESC"), SortOrder::Desc);
        assert_eq!(SortOrder::parse("desc"), SortOrder::Desc);
        assert_eq!(SortOrder::parse("ASC"), SortOrder::Asc);
        assert_eq!(SortOrder::parse("descending"), SortOrder::Asc);
        assert_eq!(SortOrder::parse(""), SortOrder::Asc);
    }
}
