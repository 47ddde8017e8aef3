//! MemoryStore — owns the SQLite connection, a DashMap read-through cache
//! for O(1)-average `get`, and the append-only admit log.

use std::path::Path;
use std::sync::Mutex;

use dashmap::DashMap;
use memcore_core::errors::StoreError;
use memcore_core::memory::Record;
use rusqlite::{params, Connection};
use tracing::{debug, info};

use crate::codec::{self, record_from_row};
use crate::schema;

/// Filter accepted by `scan_candidates`.
#[derive(Debug, Clone, Default)]
pub struct CandidateFilter {
    pub kind: Option<memcore_core::memory::RecordKind>,
    pub created_after: Option<i64>,
    pub created_before: Option<i64>,
    pub min_importance: Option<f64>,
    pub max_importance: Option<f64>,
    pub include_archived: bool,
}

/// The Memory Store. Append + fetch + secondary index over
/// all records, backed by SQLite for durability and a DashMap for O(1)
/// average reads without touching the database on the hot path.
pub struct MemoryStore {
    conn: Mutex<Connection>,
    cache: DashMap<String, Record>,
    path: Option<std::path::PathBuf>,
}

impl MemoryStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::AppendFailed {
            reason: e.to_string(),
        })?;
        schema::run_migrations(&conn)?;
        let store = Self {
            conn: Mutex::new(conn),
            cache: DashMap::new(),
            path: Some(path.to_path_buf()),
        };
        store.warm_cache()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::AppendFailed {
            reason: e.to_string(),
        })?;
        schema::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            cache: DashMap::new(),
            path: None,
        })
    }

    fn warm_cache(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        let mut stmt = conn
            .prepare("SELECT * FROM records")
            .map_err(|e| StoreError::RestoreFailed {
                reason: e.to_string(),
            })?;
        let rows = stmt
            .query_map([], record_from_row)
            .map_err(|e| StoreError::RestoreFailed {
                reason: e.to_string(),
            })?;
        for row in rows {
            let record = row.map_err(|e| StoreError::RestoreFailed {
                reason: e.to_string(),
            })?;
            self.cache.insert(record.id.clone(), record);
        }
        Ok(())
    }

    /// Append a new record. Fails with `IdCollision` only on id collision
    /// (content-addressed, so near-impossible in practice).
    pub fn put(&self, record: &Record) -> Result<(), StoreError> {
        if self.cache.contains_key(&record.id) {
            return Err(StoreError::IdCollision {
                id: record.id.clone(),
            });
        }
        let p = codec::insert_params(record)?;
        let conn = self.conn.lock().expect("store mutex poisoned");
        conn.execute(
            "INSERT INTO records (
                id, kind, created_at, tokens, embedding, importance,
                access_count, last_access_at, tags, provenance,
                compression_level, archived, truncated, original_tokens, content
            ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15)",
            params![
                p.id, p.kind, p.created_at, p.tokens, p.embedding_json, p.importance,
                p.access_count, p.last_access_at, p.tags_json, p.provenance_json,
                p.compression_level, p.archived, p.truncated, p.original_tokens, p.content,
            ],
        )
        .map_err(|e| StoreError::AppendFailed {
            reason: e.to_string(),
        })?;
        conn.execute(
            "INSERT INTO admit_log (record_id, op, logged_at) VALUES (?1, 'put', ?2)",
            params![record.id, record.created_at],
        )
        .map_err(|e| StoreError::AppendFailed {
            reason: e.to_string(),
        })?;
        drop(conn);
        self.cache.insert(record.id.clone(), record.clone());
        debug!(id = %record.id, "record appended");
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Record> {
        self.cache.get(id).map(|r| r.clone())
    }

    /// Limited to `importance`, `access_count`, `last_access_at`, `tags`,
    /// `compression_level`. Content and provenance are
    /// immutable post-admit.
    pub fn update_metadata(&self, id: &str, patch: MetadataPatch) -> Result<(), StoreError> {
        let mut entry = self
            .cache
            .get_mut(id)
            .ok_or_else(|| StoreError::PatchRejected {
                id: id.to_string(),
                reason: "unknown id".to_string(),
            })?;
        if let Some(importance) = patch.importance {
            entry.importance = importance;
        }
        if let Some(access_count) = patch.access_count {
            entry.access_count = access_count;
        }
        if let Some(last_access_at) = patch.last_access_at {
            entry.last_access_at = last_access_at;
        }
        if let Some(tags) = patch.tags {
            entry.tags = tags;
        }
        if let Some(level) = patch.compression_level {
            entry.compression_level = level;
        }
        let snapshot = entry.clone();
        drop(entry);

        let p = codec::insert_params(&snapshot)?;
        let conn = self.conn.lock().expect("store mutex poisoned");
        conn.execute(
            "UPDATE records SET importance=?1, access_count=?2, last_access_at=?3,
             tags=?4, compression_level=?5 WHERE id=?6",
            params![
                p.importance, p.access_count, p.last_access_at, p.tags_json,
                p.compression_level, p.id,
            ],
        )
        .map_err(|e| StoreError::PatchRejected {
            id: id.to_string(),
            reason: e.to_string(),
        })?;
        conn.execute(
            "INSERT INTO admit_log (record_id, op, logged_at) VALUES (?1, 'patch', ?2)",
            params![id, snapshot.last_access_at],
        )
        .map_err(|e| StoreError::AppendFailed {
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Move the record to a cold tier of the store; `get` still resolves
    /// but marks `archived=true`.
    pub fn archive(&self, id: &str) -> Result<(), StoreError> {
        let mut entry = self
            .cache
            .get_mut(id)
            .ok_or_else(|| StoreError::PatchRejected {
                id: id.to_string(),
                reason: "unknown id".to_string(),
            })?;
        entry.archived = true;
        drop(entry);

        let conn = self.conn.lock().expect("store mutex poisoned");
        conn.execute("UPDATE records SET archived=1 WHERE id=?1", params![id])
            .map_err(|e| StoreError::PatchRejected {
                id: id.to_string(),
                reason: e.to_string(),
            })?;
        conn.execute(
            "INSERT INTO admit_log (record_id, op, logged_at) VALUES (?1, 'archive', 0)",
            params![id],
        )
        .map_err(|e| StoreError::AppendFailed {
            reason: e.to_string(),
        })?;
        info!(id = %id, "record archived");
        Ok(())
    }

    /// Most-recent-first.
    pub fn iter_recent(&self, n: usize) -> Vec<Record> {
        let mut all: Vec<Record> = self.cache.iter().map(|r| r.value().clone()).collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all.truncate(n);
        all
    }

    /// Filterable scan for the Consolidation Service.
    pub fn scan_candidates(&self, filter: &CandidateFilter) -> Vec<Record> {
        self.cache
            .iter()
            .map(|r| r.value().clone())
            .filter(|r| {
                if !filter.include_archived && r.archived {
                    return false;
                }
                if let Some(kind) = filter.kind {
                    if r.kind != kind {
                        return false;
                    }
                }
                if let Some(after) = filter.created_after {
                    if r.created_at < after {
                        return false;
                    }
                }
                if let Some(before) = filter.created_before {
                    if r.created_at > before {
                        return false;
                    }
                }
                if let Some(min) = filter.min_importance {
                    if r.importance.value() < min {
                        return false;
                    }
                }
                if let Some(max) = filter.max_importance {
                    if r.importance.value() > max {
                        return false;
                    }
                }
                true
            })
            .collect()
    }

    pub fn count(&self) -> usize {
        self.cache.len()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        f(&conn)
    }

    pub fn exists(&self, id: &str) -> bool {
        self.cache.contains_key(id)
    }
}

/// Patch accepted by `update_metadata`. All fields optional;
/// only present fields are applied.
#[derive(Debug, Clone, Default)]
pub struct MetadataPatch {
    pub importance: Option<memcore_core::memory::Importance>,
    pub access_count: Option<u64>,
    pub last_access_at: Option<i64>,
    pub tags: Option<std::collections::BTreeSet<String>>,
    pub compression_level: Option<u32>,
}
