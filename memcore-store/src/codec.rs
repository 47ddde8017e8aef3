use std::collections::BTreeSet;

use memcore_core::errors::StoreError;
use memcore_core::memory::{Record, RecordKind};
use rusqlite::Row;

pub fn kind_to_str(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Conversation => "conversation",
        RecordKind::Code => "code",
        RecordKind::Concept => "concept",
        RecordKind::Reasoning => "reasoning",
        RecordKind::Fact => "fact",
        RecordKind::Reference => "reference",
        RecordKind::Summary => "summary",
        RecordKind::Merged => "merged",
        RecordKind::Reflection => "reflection",
        RecordKind::System => "system",
    }
}

pub fn str_to_kind(s: &str) -> Result<RecordKind, StoreError> {
    Ok(match s {
        "conversation" => RecordKind::Conversation,
        "code" => RecordKind::Code,
        "concept" => RecordKind::Concept,
        "reasoning" => RecordKind::Reasoning,
        "fact" => RecordKind::Fact,
        "reference" => RecordKind::Reference,
        "summary" => RecordKind::Summary,
        "merged" => RecordKind::Merged,
        "reflection" => RecordKind::Reflection,
        "system" => RecordKind::System,
        other => {
            return Err(StoreError::IntegrityCheckFailed {
                details: format!("unknown record kind in storage: {other}"),
            })
        }
    })
}

pub fn record_from_row(row: &Row) -> rusqlite::Result<Record> {
    let kind_str: String = row.get("kind")?;
    let kind = str_to_kind(&kind_str).unwrap_or(RecordKind::Fact);
    let embedding_json: Option<String> = row.get("embedding")?;
    let embedding = embedding_json.and_then(|s| serde_json::from_str::<Vec<f32>>(&s).ok());
    let tags_json: String = row.get("tags")?;
    let tags: BTreeSet<String> = serde_json::from_str(&tags_json).unwrap_or_default();
    let provenance_json: String = row.get("provenance")?;
    let provenance: BTreeSet<String> = serde_json::from_str(&provenance_json).unwrap_or_default();

    Ok(Record {
        id: row.get("id")?,
        content: row.get("content")?,
        kind,
        created_at: row.get("created_at")?,
        tokens: row.get("tokens")?,
        embedding,
        importance: memcore_core::memory::Importance::new(row.get("importance")?),
        access_count: row.get::<_, i64>("access_count")? as u64,
        last_access_at: row.get("last_access_at")?,
        tags,
        provenance,
        compression_level: row.get::<_, i64>("compression_level")? as u32,
        archived: row.get::<_, i64>("archived")? != 0,
        truncated: row.get::<_, i64>("truncated")? != 0,
        original_tokens: row.get::<_, Option<i64>>("original_tokens")?.map(|v| v as u32),
    })
}

pub fn insert_params(record: &Record) -> Result<InsertParams, StoreError> {
    let embedding_json = record
        .embedding
        .as_ref()
        .map(|e| serde_json::to_string(e))
        .transpose()
        .map_err(|e| StoreError::AppendFailed {
            reason: e.to_string(),
        })?;
    let tags_json = serde_json::to_string(&record.tags).map_err(|e| StoreError::AppendFailed {
        reason: e.to_string(),
    })?;
    let provenance_json =
        serde_json::to_string(&record.provenance).map_err(|e| StoreError::AppendFailed {
            reason: e.to_string(),
        })?;
    Ok(InsertParams {
        id: record.id.clone(),
        kind: kind_to_str(record.kind).to_string(),
        created_at: record.created_at,
        tokens: record.tokens,
        embedding_json,
        importance: record.importance.value(),
        access_count: record.access_count as i64,
        last_access_at: record.last_access_at,
        tags_json,
        provenance_json,
        compression_level: record.compression_level as i64,
        archived: record.archived as i64,
        truncated: record.truncated as i64,
        original_tokens: record.original_tokens.map(|v| v as i64),
        content: record.content.clone(),
    })
}

pub struct InsertParams {
    pub id: String,
    pub kind: String,
    pub created_at: i64,
    pub tokens: u32,
    pub embedding_json: Option<String>,
    pub importance: f64,
    pub access_count: i64,
    pub last_access_at: i64,
    pub tags_json: String,
    pub provenance_json: String,
    pub compression_level: i64,
    pub archived: i64,
    pub truncated: i64,
    pub original_tokens: Option<i64>,
    pub content: Vec<u8>,
}
