//! Flat index documents.
//!
//! Each content type has its own document struct so that every declared
//! field is present by construction: text fields are plain `String`s,
//! defaulted to `""` by the transforms, never `Option`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Document primary key, copied verbatim from the source record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentId {
    Int(i64),
    /// Integer ids above `i64::MAX`.
    UInt(u64),
    Text(String),
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentId::Int(id) => write!(f, "{}", id),
            DocumentId::UInt(id) => write!(f, "{}", id),
            DocumentId::Text(id) => f.write_str(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndustryDocument {
    pub id: DocumentId,
    pub name: String,
    pub slug: String,
    pub seo_title: String,
    pub shipping_address: String,
    pub catalog_url: String,
    /// Popular analyses bullet items, one `text` per item.
    pub popular_analyses_text: String,
    /// Table section titles.
    pub table_titles: String,
    /// Table section note, content and clarifications.
    pub table_content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlogPostDocument {
    pub id: DocumentId,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub tags_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaboratoryDocument {
    pub id: DocumentId,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceDocument {
    pub id: DocumentId,
    pub title: String,
    pub description: String,
    pub resource_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoDocument {
    pub id: DocumentId,
    pub title: String,
    pub description: String,
    pub youtube_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamMemberDocument {
    pub id: DocumentId,
    pub name: String,
    pub title: String,
}

/// Any of the six document shapes. Serializes as the bare flat object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum IndexDocument {
    Industry(IndustryDocument),
    BlogPost(BlogPostDocument),
    Laboratory(LaboratoryDocument),
    Resource(ResourceDocument),
    Video(VideoDocument),
    TeamMember(TeamMemberDocument),
}

impl IndexDocument {
    pub fn id(&self) -> &DocumentId {
        match self {
            IndexDocument::Industry(d) => &d.id,
            IndexDocument::BlogPost(d) => &d.id,
            IndexDocument::Laboratory(d) => &d.id,
            IndexDocument::Resource(d) => &d.id,
            IndexDocument::Video(d) => &d.id,
            IndexDocument::TeamMember(d) => &d.id,
        }
    }

    /// The document as a JSON object, ready for the search service.
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

macro_rules! impl_from_document {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for IndexDocument {
                fn from(doc: $ty) -> Self {
                    IndexDocument::$variant(doc)
                }
            }
        )*
    };
}

impl_from_document! {
    Industry => IndustryDocument,
    BlogPost => BlogPostDocument,
    Laboratory => LaboratoryDocument,
    Resource => ResourceDocument,
    Video => VideoDocument,
    TeamMember => TeamMemberDocument,
}
