use rusqlite::Connection;

use memcore_core::errors::StoreError;

/// Create the `records` and `admit_log` tables if they don't exist.
/// Mirrors `cortex-storage`'s migration pattern, collapsed to a single
/// idempotent statement batch since this schema never needs to evolve
/// across versions within this crate's scope.
pub fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS records (
            id TEXT PRIMARY KEY,
            kind TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            tokens INTEGER NOT NULL,
            embedding TEXT,
            importance REAL NOT NULL,
            access_count INTEGER NOT NULL,
            last_access_at INTEGER NOT NULL,
            tags TEXT NOT NULL,
            provenance TEXT NOT NULL,
            compression_level INTEGER NOT NULL,
            archived INTEGER NOT NULL,
            truncated INTEGER NOT NULL,
            original_tokens INTEGER,
            content BLOB NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_records_created_at ON records(created_at);
        CREATE INDEX IF NOT EXISTS idx_records_kind ON records(kind);
        CREATE INDEX IF NOT EXISTS idx_records_importance ON records(importance);

        CREATE TABLE IF NOT EXISTS admit_log (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            record_id TEXT NOT NULL,
            op TEXT NOT NULL,
            logged_at INTEGER NOT NULL
        );
        "#,
    )
    .map_err(|e| StoreError::AppendFailed {
        reason: e.to_string(),
    })
}
