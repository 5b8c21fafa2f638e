//! Index settings: listing and pushing them to the search service.

use anyhow::Result;
use content_gate_core::{ContentType, IndexSettings};
use serde::Serialize;

use crate::config::Config;
use crate::search_client::{MeiliClient, SearchIndex};

/// One content type's index settings, as listed by the CLI and
/// `GET /indexes`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub content_type: ContentType,
    #[serde(flatten)]
    pub settings: IndexSettings,
}

impl From<ContentType> for IndexEntry {
    fn from(content_type: ContentType) -> Self {
        Self {
            content_type,
            settings: *content_type.settings(),
        }
    }
}

/// Settings for one content type, or all six in declaration order.
pub fn index_entries(content_type: Option<ContentType>) -> Vec<IndexEntry> {
    match content_type {
        Some(ct) => vec![ct.into()],
        None => ContentType::ALL.into_iter().map(IndexEntry::from).collect(),
    }
}

/// `cgate indexes`: print index settings as JSON.
pub fn run_list(content_type: Option<ContentType>) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&index_entries(content_type))?
    );
    Ok(())
}

/// Create and configure each index on the search service.
pub async fn configure_indexes(
    search: &dyn SearchIndex,
    content_type: Option<ContentType>,
) -> Result<usize> {
    let entries = index_entries(content_type);
    for entry in &entries {
        search.configure_index(&entry.settings).await?;
    }
    Ok(entries.len())
}

/// `cgate configure`: push settings for one or all content types.
pub async fn run_configure(config: &Config, content_type: Option<ContentType>) -> Result<()> {
    let client = MeiliClient::new(&config.search)?;
    let count = configure_indexes(&client, content_type).await?;
    println!("configured indexes: {}", count);
    Ok(())
}
