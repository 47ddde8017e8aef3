//! Snapshot/restore of the Memory Store.
//!
//! A snapshot directory contains `snapshot.db` (a full SQLite backup) and
//! `manifest.json` (the parameters manifest: `T`, capacities, thresholds,
//! weights, compression policies, embedding dimension `D`). A mismatched
//! manifest on restore is a hard error (`StoreError::ManifestMismatch`).

use std::fs;
use std::path::Path;
use std::time::Duration;

use memcore_core::errors::StoreError;
use rusqlite::backup::Backup;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::engine::MemoryStore;

/// The parameters manifest recorded alongside a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParametersManifest {
    pub tier_count: usize,
    pub tier_capacities: Vec<u32>,
    pub tier_importance_thresholds: Vec<String>,
    pub embedding_dim: usize,
}

pub fn snapshot(store: &MemoryStore, dir: &Path, manifest: &ParametersManifest) -> Result<(), StoreError> {
    fs::create_dir_all(dir).map_err(|e| StoreError::SnapshotFailed {
        reason: e.to_string(),
    })?;
    let db_path = dir.join("snapshot.db");
    let mut dst = Connection::open(&db_path).map_err(|e| StoreError::SnapshotFailed {
        reason: e.to_string(),
    })?;

    store.with_conn(|src| {
        let backup = Backup::new(src, &mut dst).map_err(|e| StoreError::SnapshotFailed {
            reason: e.to_string(),
        })?;
        backup
            .run_to_completion(5, Duration::from_millis(50), None)
            .map_err(|e| StoreError::SnapshotFailed {
                reason: e.to_string(),
            })
    })?;

    let manifest_path = dir.join("manifest.json");
    let manifest_json = serde_json::to_string_pretty(manifest).map_err(|e| StoreError::SnapshotFailed {
        reason: e.to_string(),
    })?;
    fs::write(&manifest_path, manifest_json).map_err(|e| StoreError::SnapshotFailed {
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Restore a `MemoryStore` from a snapshot directory. The caller's
/// `expected` manifest must match the persisted one exactly, or this
/// returns `ManifestMismatch` without opening the store.
pub fn restore(dir: &Path, expected: &ParametersManifest) -> Result<MemoryStore, StoreError> {
    let manifest_path = dir.join("manifest.json");
    let manifest_json = fs::read_to_string(&manifest_path).map_err(|e| StoreError::RestoreFailed {
        reason: e.to_string(),
    })?;
    let found: ParametersManifest =
        serde_json::from_str(&manifest_json).map_err(|e| StoreError::RestoreFailed {
            reason: e.to_string(),
        })?;
    if &found != expected {
        return Err(StoreError::ManifestMismatch {
            expected: format!("{expected:?}"),
            found: format!("{found:?}"),
        });
    }

    let db_path = dir.join("snapshot.db");
    if !db_path.exists() {
        return Err(StoreError::RestoreFailed {
            reason: "snapshot.db missing from snapshot directory".to_string(),
        });
    }
    MemoryStore::open(&db_path)
}
