//! Static dispatch from content type to its transform and index settings.
//!
//! The set of content types is closed. Adding one means adding a variant
//! here, a document struct, a transform, and a settings constant; nothing
//! is discovered at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::document::IndexDocument;
use crate::error::{TransformError, UnknownContentType};
use crate::record::ContentRecord;
use crate::settings::{self, IndexSettings};
use crate::transform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    Industry,
    BlogPost,
    Laboratory,
    Resource,
    Video,
    TeamMember,
}

impl ContentType {
    pub const ALL: [ContentType; 6] = [
        ContentType::Industry,
        ContentType::BlogPost,
        ContentType::Laboratory,
        ContentType::Resource,
        ContentType::Video,
        ContentType::TeamMember,
    ];

    /// The CMS tag for this content type (e.g. `"blog-post"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Industry => "industry",
            ContentType::BlogPost => "blog-post",
            ContentType::Laboratory => "laboratory",
            ContentType::Resource => "resource",
            ContentType::Video => "video",
            ContentType::TeamMember => "team-member",
        }
    }

    pub fn settings(&self) -> &'static IndexSettings {
        match self {
            ContentType::Industry => &settings::INDUSTRY,
            ContentType::BlogPost => &settings::BLOG_POST,
            ContentType::Laboratory => &settings::LABORATORY,
            ContentType::Resource => &settings::RESOURCE,
            ContentType::Video => &settings::VIDEO,
            ContentType::TeamMember => &settings::TEAM_MEMBER,
        }
    }

    pub fn index_name(&self) -> &'static str {
        self.settings().index_name
    }

    /// Run this content type's transform on a populated record.
    pub fn transform(&self, record: &ContentRecord) -> Result<IndexDocument, TransformError> {
        let doc: IndexDocument = match self {
            ContentType::Industry => transform::industry(record)?.into(),
            ContentType::BlogPost => transform::blog_post(record)?.into(),
            ContentType::Laboratory => transform::laboratory(record)?.into(),
            ContentType::Resource => transform::resource(record)?.into(),
            ContentType::Video => transform::video(record)?.into(),
            ContentType::TeamMember => transform::team_member(record)?.into(),
        };
        Ok(doc)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = UnknownContentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentType::ALL
            .into_iter()
            .find(|ct| ct.as_str() == s)
            .ok_or_else(|| UnknownContentType(s.to_string()))
    }
}
