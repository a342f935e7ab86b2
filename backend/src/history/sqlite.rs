use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use kg_explorer_common::SearchLogEntry;

/// SQLite-backed, append-only log of issued searches.
///
/// Every operation opens its own connection and closes it when done, so
/// several processes can share the same file and rely on SQLite's locking.
pub struct SearchLogStore {
    path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Query must not be empty")]
    EmptyQuery,
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::DatabaseError(e.to_string())
    }
}

impl SearchLogStore {
    /// Create a store for the given database URL and make sure the schema exists.
    pub fn new(database_url: &str) -> Result<Self, StoreError> {
        let path = database_url.strip_prefix("sqlite:").unwrap_or(database_url);

        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::IoError(e.to_string()))?;
            }
        }

        let store = Self {
            path: PathBuf::from(path),
        };
        store.ensure_schema()?;

        tracing::info!("Search log initialized with database: {}", path);
        Ok(store)
    }

    fn open(&self) -> Result<Connection, StoreError> {
        Ok(Connection::open(&self.path)?)
    }

    /// Create the `searches` table if absent. Safe to call any number of times.
    pub fn ensure_schema(&self) -> Result<(), StoreError> {
        let conn = self.open()?;
        Self::create_schema(&conn)
    }

    fn create_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS searches (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                query TEXT NOT NULL,
                language TEXT NOT NULL,
                timestamp DATETIME DEFAULT CURRENT_TIMESTAMP,
                ip_address TEXT
            )",
            [],
        )?;

        // Tables created before client addresses were recorded lack the column.
        let has_ip: bool = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('searches') WHERE name = 'ip_address'",
                [],
                |row| row.get::<_, i64>(0),
            )
            .map(|n| n > 0)?;

        if !has_ip {
            conn.execute("ALTER TABLE searches ADD COLUMN ip_address TEXT", [])?;
            tracing::info!("Added ip_address column to searches table");
        }

        Ok(())
    }

    /// Record one search. Returns the assigned id.
    pub fn append(
        &self,
        query: &str,
        language: &str,
        ip_address: Option<&str>,
    ) -> Result<i64, StoreError> {
        if query.trim().is_empty() {
            return Err(StoreError::EmptyQuery);
        }

        let conn = self.open()?;
        Self::create_schema(&conn)?;

        conn.execute(
            "INSERT INTO searches (query, language, timestamp, ip_address) VALUES (?1, ?2, ?3, ?4)",
            params![query, language, Utc::now().to_rfc3339(), ip_address],
        )?;

        let id = conn.last_insert_rowid();
        tracing::debug!("Logged search {} ({}): {}", id, language, query);
        Ok(id)
    }

    /// All entries, newest first, optionally capped at `limit`.
    pub fn all_entries(&self, limit: Option<u32>) -> Result<Vec<SearchLogEntry>, StoreError> {
        let conn = self.open()?;
        Self::create_schema(&conn)?;

        // SQLite treats a negative LIMIT as "no limit".
        let limit = limit.map(i64::from).unwrap_or(-1);

        let mut stmt = conn.prepare(
            "SELECT id, query, language, timestamp, ip_address
             FROM searches
             ORDER BY id DESC
             LIMIT ?1",
        )?;

        let entries = stmt
            .query_map(params![limit], row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// The most recent entries for the history view.
    ///
    /// No caller identity is recorded, so this is the global recent list.
    pub fn recent_entries(&self, limit: u32) -> Result<Vec<SearchLogEntry>, StoreError> {
        self.all_entries(Some(limit))
    }

    /// Total number of stored entries.
    pub fn count(&self) -> Result<u64, StoreError> {
        let conn = self.open()?;
        Self::create_schema(&conn)?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM searches", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Look up a single entry by id.
    pub fn get(&self, id: i64) -> Result<Option<SearchLogEntry>, StoreError> {
        let conn = self.open()?;
        Self::create_schema(&conn)?;

        let entry = conn
            .query_row(
                "SELECT id, query, language, timestamp, ip_address FROM searches WHERE id = ?1",
                params![id],
                row_to_entry,
            )
            .optional()?;
        Ok(entry)
    }
}

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<SearchLogEntry> {
    let raw_timestamp: Option<String> = row.get(3)?;
    Ok(SearchLogEntry {
        id: row.get(0)?,
        query: row.get(1)?,
        language: row.get(2)?,
        timestamp: raw_timestamp
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        ip_address: row.get(4)?,
    })
}

/// Parse RFC 3339 timestamps and SQLite's `CURRENT_TIMESTAMP` format (UTC).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, SearchLogStore) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("search_logs.db").display());
        let store = SearchLogStore::new(&url).unwrap();
        (dir, store)
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let (_dir, store) = test_store();
        store.ensure_schema().unwrap();
        store.ensure_schema().unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_empty_log_returns_empty_vec() {
        let (_dir, store) = test_store();
        assert!(store.all_entries(None).unwrap().is_empty());
        assert!(store.recent_entries(20).unwrap().is_empty());
    }

    #[test]
    fn test_append_then_all_entries_newest_first() {
        let (_dir, store) = test_store();
        let first = store.append("Madrid", "es", None).unwrap();
        let second = store.append("Paris", "fr", Some("203.0.113.7")).unwrap();
        assert!(second > first);

        let entries = store.all_entries(None).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, second);
        assert_eq!(entries[0].query, "Paris");
        assert_eq!(entries[0].language, "fr");
        assert_eq!(entries[0].ip_address.as_deref(), Some("203.0.113.7"));
        assert!(entries[0].timestamp > DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(entries[1].query, "Madrid");
        assert!(entries[1].ip_address.is_none());
    }

    #[test]
    fn test_limit_caps_result_not_storage() {
        let (_dir, store) = test_store();
        for i in 0..5 {
            store.append(&format!("keyword {}", i), "en", None).unwrap();
        }

        let capped = store.all_entries(Some(2)).unwrap();
        assert_eq!(capped.len(), 2);
        assert_eq!(capped[0].query, "keyword 4");
        assert_eq!(capped[1].query, "keyword 3");
        assert_eq!(store.count().unwrap(), 5);
        assert_eq!(store.recent_entries(3).unwrap().len(), 3);
    }

    #[test]
    fn test_append_rejects_empty_query() {
        let (_dir, store) = test_store();
        let err = store.append("   ", "es", None).unwrap_err();
        assert!(matches!(err, StoreError::EmptyQuery));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_get_entry() {
        let (_dir, store) = test_store();
        let id = store.append("Roma", "it", None).unwrap();
        let entry = store.get(id).unwrap().unwrap();
        assert_eq!(entry.query, "Roma");
        assert!(store.get(id + 100).unwrap().is_none());
    }

    #[test]
    fn test_legacy_table_gains_ip_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute(
                "CREATE TABLE searches (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    query TEXT NOT NULL,
                    language TEXT NOT NULL,
                    timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )
            .unwrap();
            conn.execute(
                "INSERT INTO searches (query, language, timestamp) VALUES ('Berlin', 'de', '2025-01-15 08:30:00')",
                [],
            )
            .unwrap();
        }

        let store = SearchLogStore::new(path.to_str().unwrap()).unwrap();
        store.append("Lisboa", "es", Some("198.51.100.2")).unwrap();

        let entries = store.all_entries(None).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].query, "Lisboa");
        assert_eq!(entries[1].query, "Berlin");
        assert!(entries[1].ip_address.is_none());
        assert_eq!(
            entries[1].timestamp,
            parse_timestamp("2025-01-15T08:30:00Z").unwrap()
        );
    }

    #[test]
    fn test_unopenable_database_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = SearchLogStore {
            path: dir.path().to_path_buf(),
        };
        assert!(store.all_entries(None).is_err());
        assert!(store.append("Madrid", "es", None).is_err());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2025-02-01T10:00:00+00:00").is_some());
        assert!(parse_timestamp("2025-02-01 10:00:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
