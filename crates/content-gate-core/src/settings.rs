//! Static per-content-type index configuration.
//!
//! `searchable_attributes` order drives relevance in the search service and
//! is kept exactly as listed. `displayed_attributes` bounds what queries
//! return. `populate` names the relations the CMS must resolve before a
//! record reaches the transform.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSettings {
    pub index_name: &'static str,
    pub populate: &'static [&'static str],
    pub searchable_attributes: &'static [&'static str],
    pub displayed_attributes: &'static [&'static str],
}

impl IndexSettings {
    /// Every field a document of this type must carry.
    pub fn declared_attributes(&self) -> impl Iterator<Item = &'static str> {
        let mut seen: Vec<&'static str> = Vec::new();
        for attr in self
            .searchable_attributes
            .iter()
            .chain(self.displayed_attributes.iter())
        {
            if !seen.contains(attr) {
                seen.push(*attr);
            }
        }
        seen.into_iter()
    }
}

pub const INDUSTRY: IndexSettings = IndexSettings {
    index_name: "industries",
    populate: &["popular_analyses", "table_sections"],
    searchable_attributes: &[
        "name",
        "seo_title",
        "shipping_address",
        "catalog_url",
        "popular_analyses_text",
        "table_titles",
        "table_content",
    ],
    displayed_attributes: &["id", "name", "slug"],
};

pub const BLOG_POST: IndexSettings = IndexSettings {
    index_name: "blog-posts",
    populate: &["tags"],
    searchable_attributes: &["title", "excerpt", "tags_text"],
    displayed_attributes: &["id", "title", "slug", "excerpt"],
};

pub const LABORATORY: IndexSettings = IndexSettings {
    index_name: "laboratories",
    populate: &[],
    searchable_attributes: &["name"],
    displayed_attributes: &["id", "name", "slug"],
};

pub const RESOURCE: IndexSettings = IndexSettings {
    index_name: "resources",
    populate: &[],
    searchable_attributes: &["title", "description", "resource_type"],
    displayed_attributes: &["id", "title", "description", "resource_type"],
};

pub const VIDEO: IndexSettings = IndexSettings {
    index_name: "videos",
    populate: &[],
    searchable_attributes: &["title", "description"],
    displayed_attributes: &["id", "title", "description", "youtube_url"],
};

pub const TEAM_MEMBER: IndexSettings = IndexSettings {
    index_name: "team-members",
    populate: &[],
    searchable_attributes: &["name", "title"],
    displayed_attributes: &["id", "name", "title"],
};
