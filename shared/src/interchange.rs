//! JSON import/export document.
//!
//! Version 1 files predate `category`; very old records carry `timestamp`
//! instead of `createdAt`. Both are accepted on import. Export always writes
//! the current version.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::entity::{BubbleEntity, Millis};

/// Document version written by [`export_document`].
pub const EXPORT_VERSION: u32 = 2;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: u32,
    /// RFC 3339 UTC timestamp
    pub exported_at: String,
    pub bubbles: Vec<BubbleEntity>,
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document has no bubbles list")]
    MissingBubbles,
    #[error("bubble #{index} is malformed: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

/// Record shape accepted on import, old and new.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportedBubble {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    created_at: Option<Millis>,
    /// Pre-history field name for the creation time
    #[serde(default)]
    timestamp: Option<Millis>,
    #[serde(default)]
    history: Option<Vec<Millis>>,
}

impl ImportedBubble {
    fn into_entity(self, now: Millis) -> BubbleEntity {
        // Zero is treated as missing, like the stored records always have.
        let created_at = self
            .created_at
            .filter(|t| *t != 0)
            .or(self.timestamp.filter(|t| *t != 0))
            .unwrap_or(now);
        BubbleEntity {
            id: self.id,
            name: self.name,
            image_ref: self.image,
            category: self.category,
            created_at,
            history: self.history.unwrap_or_default(),
        }
    }
}

/// Parse an export file. `now` fills in a creation time when a record has none.
pub fn import_document(json: &str, now: Millis) -> Result<Vec<BubbleEntity>, ImportError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let records = value
        .get("bubbles")
        .and_then(|b| b.as_array())
        .ok_or(ImportError::MissingBubbles)?;

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            ImportedBubble::deserialize(record)
                .map(|raw| raw.into_entity(now))
                .map_err(|e| ImportError::InvalidRecord {
                    index,
                    reason: e.to_string(),
                })
        })
        .collect()
}

/// Build the export document for `entities` at `now`.
pub fn export_document(entities: &[BubbleEntity], now: Millis) -> ExportDocument {
    ExportDocument {
        version: EXPORT_VERSION,
        exported_at: iso_timestamp(now),
        bubbles: entities.to_vec(),
    }
}

/// Pretty-printed JSON for an export document.
pub fn to_json(doc: &ExportDocument) -> serde_json::Result<String> {
    serde_json::to_string_pretty(doc)
}

/// Suggested download name, e.g. `habits-export-2026-10-17.json`.
pub fn export_file_name(now: Millis) -> String {
    format!("habits-export-{}.json", utc(now).format("%Y-%m-%d"))
}

fn iso_timestamp(now: Millis) -> String {
    utc(now).to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn utc(ms: Millis) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}
