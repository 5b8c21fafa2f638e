//! Record sync: CMS lifecycle events → search index writes.
//!
//! The CMS fires an event whenever an entry of a watched content type
//! changes. Upsert events (`create`, `update`, `publish`) run the content
//! type's transform and push the document; removal events (`unpublish`,
//! `delete`) delete the document by id. The transform runs before any
//! network call, so a bad record never reaches the search service.
//!
//! The same path backs the `cgate sync` and `cgate transform` commands,
//! which read populated records from a JSON file.

use anyhow::{Context, Result};
use content_gate_core::{ContentRecord, ContentType, DocumentId, IndexDocument, TransformError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

use crate::config::Config;
use crate::search_client::{MeiliClient, SearchIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncEvent {
    Create,
    Update,
    Publish,
    Unpublish,
    Delete,
}

impl SyncEvent {
    /// True for events that take the document out of the index.
    pub fn is_removal(&self) -> bool {
        matches!(self, SyncEvent::Unpublish | SyncEvent::Delete)
    }
}

/// What a sync event did to the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum SyncOutcome {
    Upserted { index: String, id: DocumentId },
    Deleted { index: String, id: DocumentId },
}

#[derive(Debug, Error)]
pub enum SyncError {
    /// The record breaks the record contract; retrying will not help.
    #[error(transparent)]
    Record(#[from] TransformError),

    /// The search service rejected or never received the write.
    #[error("{0:#}")]
    Push(anyhow::Error),
}

/// Apply one CMS lifecycle event to the search index.
pub async fn apply_event(
    search: &dyn SearchIndex,
    content_type: ContentType,
    event: SyncEvent,
    record: &ContentRecord,
) -> Result<SyncOutcome, SyncError> {
    let index = content_type.index_name();

    if event.is_removal() {
        let id = record.id(content_type.as_str())?;
        search
            .delete_document(index, &id)
            .await
            .map_err(SyncError::Push)?;
        tracing::info!(content_type = %content_type, index, id = %id, ?event, "document removed");
        return Ok(SyncOutcome::Deleted {
            index: index.to_string(),
            id,
        });
    }

    let document = content_type.transform(record)?;
    let id = document.id().clone();
    search
        .upsert_documents(index, std::slice::from_ref(&document))
        .await
        .map_err(SyncError::Push)?;
    tracing::info!(content_type = %content_type, index, id = %id, ?event, "document upserted");

    Ok(SyncOutcome::Upserted {
        index: index.to_string(),
        id,
    })
}

/// Read populated records from a JSON file.
///
/// Accepts a single record object, an array of records, or a CMS REST
/// envelope `{ "data": [...] }`.
pub fn load_records(path: &Path) -> Result<Vec<ContentRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read records file: {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse records file: {}", path.display()))?;
    records_from_value(value)
}

fn records_from_value(value: Value) -> Result<Vec<ContentRecord>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("data") {
            Some(Value::Array(items)) if !obj.contains_key("id") => items,
            Some(Value::Object(single)) if !obj.contains_key("id") => vec![Value::Object(single)],
            Some(data) => {
                obj.insert("data".to_string(), data);
                vec![Value::Object(obj)]
            }
            None => vec![Value::Object(obj)],
        },
        _ => anyhow::bail!("records file must contain a JSON object or array"),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            ContentRecord::from_value(item).with_context(|| format!("record #{}", i + 1))
        })
        .collect()
}

/// Transform every record, stopping at the first contract violation.
pub fn transform_all(
    content_type: ContentType,
    records: &[ContentRecord],
) -> Result<Vec<IndexDocument>> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            content_type
                .transform(record)
                .with_context(|| format!("{} record #{}", content_type, i + 1))
        })
        .collect()
}

/// `cgate transform`: print the documents a records file produces.
pub fn run_transform(content_type: ContentType, path: &Path) -> Result<()> {
    let records = load_records(path)?;
    let documents = transform_all(content_type, &records)?;
    println!("{}", serde_json::to_string_pretty(&documents)?);
    Ok(())
}

/// `cgate sync`: transform a records file and upsert it into the index.
pub async fn run_sync(
    config: &Config,
    content_type: ContentType,
    path: &Path,
    dry_run: bool,
) -> Result<()> {
    let records = load_records(path)?;
    let documents = transform_all(content_type, &records)?;
    let index = content_type.index_name();

    if dry_run {
        println!("sync {} (dry-run)", content_type);
        println!("  index: {}", index);
        println!("  records: {}", records.len());
        println!("  documents: {}", documents.len());
        return Ok(());
    }

    let client = MeiliClient::new(&config.search)?;
    client.upsert_documents(index, &documents).await?;

    println!("sync {}", content_type);
    println!("  index: {}", index);
    println!("  upserted documents: {}", documents.len());
    println!("ok");

    Ok(())
}
