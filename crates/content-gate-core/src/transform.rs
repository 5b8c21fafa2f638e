//! Per-content-type transforms: populated record → flat index document.
//!
//! All six share the same policy:
//!
//! - `id` is copied verbatim and is required.
//! - Scalar text is read with [`ContentRecord::text`], so absent or null
//!   values become `""`.
//! - Relations are collapsed with [`flatten_relation`].
//!
//! Each transform is a pure function of its input. Running it twice on the
//! same record yields the same document, which is what makes re-pushing a
//! document to the search service after a failed attempt safe.

use crate::document::{
    BlogPostDocument, IndustryDocument, LaboratoryDocument, ResourceDocument, TeamMemberDocument,
    VideoDocument,
};
use crate::error::TransformError;
use crate::flatten::flatten_relation;
use crate::record::ContentRecord;

pub fn industry(record: &ContentRecord) -> Result<IndustryDocument, TransformError> {
    let table_sections = record.relation("table_sections")?;

    Ok(IndustryDocument {
        id: record.id("industry")?,
        name: record.text("name")?,
        slug: record.text("slug")?,
        seo_title: record.text("seo_title")?,
        shipping_address: record.text("shipping_address")?,
        catalog_url: record.text("catalog_url")?,
        popular_analyses_text: flatten_relation(record.relation("popular_analyses")?, &["text"])?,
        table_titles: flatten_relation(table_sections, &["title"])?,
        table_content: flatten_relation(table_sections, &["note", "content", "clarifications"])?,
    })
}

pub fn blog_post(record: &ContentRecord) -> Result<BlogPostDocument, TransformError> {
    Ok(BlogPostDocument {
        id: record.id("blog-post")?,
        title: record.text("title")?,
        slug: record.text("slug")?,
        excerpt: record.text("excerpt")?,
        tags_text: flatten_relation(record.relation("tags")?, &["name"])?,
    })
}

pub fn laboratory(record: &ContentRecord) -> Result<LaboratoryDocument, TransformError> {
    Ok(LaboratoryDocument {
        id: record.id("laboratory")?,
        name: record.text("name")?,
        slug: record.text("slug")?,
    })
}

pub fn resource(record: &ContentRecord) -> Result<ResourceDocument, TransformError> {
    Ok(ResourceDocument {
        id: record.id("resource")?,
        title: record.text("title")?,
        description: record.text("description")?,
        resource_type: record.text("resource_type")?,
    })
}

pub fn video(record: &ContentRecord) -> Result<VideoDocument, TransformError> {
    Ok(VideoDocument {
        id: record.id("video")?,
        title: record.text("title")?,
        description: record.text("description")?,
        youtube_url: record.text("youtube_url")?,
    })
}

pub fn team_member(record: &ContentRecord) -> Result<TeamMemberDocument, TransformError> {
    Ok(TeamMemberDocument {
        id: record.id("team-member")?,
        name: record.text("name")?,
        title: record.text("title")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentId;
    use serde_json::{json, Value};

    fn record(value: Value) -> ContentRecord {
        ContentRecord::from_value(value).unwrap()
    }

    #[test]
    fn test_industry_full_record() {
        let doc = industry(&record(json!({
            "id": 1,
            "name": "Agronomy",
            "slug": "agronomy",
            "seo_title": "Agronomy Testing Services",
            "shipping_address": "13611 B Street, Omaha NE 68144",
            "catalog_url": "https://labs.test/catalog",
            "intro_text": "not indexed",
            "popular_analyses": [{"text": "Soil & Soil Health"}, {"text": "Plant Tissue"}],
            "table_sections": [
                {"title": "Soil", "note": "A", "content": "B", "clarifications": ""},
                {"title": "Water", "note": "", "content": "D"},
            ],
        })))
        .unwrap();

        assert_eq!(doc.id, DocumentId::Int(1));
        assert_eq!(doc.name, "Agronomy");
        assert_eq!(doc.popular_analyses_text, "Soil & Soil Health Plant Tissue");
        assert_eq!(doc.table_titles, "Soil Water");
        assert_eq!(doc.table_content, "A B D");
    }

    #[test]
    fn test_industry_without_relations() {
        let doc = industry(&record(json!({"id": 2, "name": "Fuel", "slug": "fuel"}))).unwrap();
        assert_eq!(doc.seo_title, "");
        assert_eq!(doc.shipping_address, "");
        assert_eq!(doc.catalog_url, "");
        assert_eq!(doc.popular_analyses_text, "");
        assert_eq!(doc.table_titles, "");
        assert_eq!(doc.table_content, "");
    }

    #[test]
    fn test_industry_untitled_sections() {
        let doc = industry(&record(json!({
            "id": 3,
            "table_sections": [{"title": "Feed"}, {"note": "only a note"}],
        })))
        .unwrap();
        assert_eq!(doc.table_titles, "Feed ");
        assert_eq!(doc.table_content, " only a note");
    }

    #[test]
    fn test_blog_post_tags_flattened() {
        let doc = blog_post(&record(json!({
            "id": 10,
            "title": "Fall sampling",
            "slug": "fall-sampling",
            "tags": [{"name": "soil"}, {"name": "compost"}],
        })))
        .unwrap();
        assert_eq!(doc.tags_text, "soil compost");
        assert_eq!(doc.excerpt, "");
    }

    #[test]
    fn test_blog_post_without_tags() {
        let with_empty = blog_post(&record(json!({"id": 1, "title": "t", "tags": []}))).unwrap();
        let without = blog_post(&record(json!({"id": 1, "title": "t"}))).unwrap();
        assert_eq!(with_empty.tags_text, "");
        assert_eq!(without.tags_text, "");
    }

    #[test]
    fn test_laboratory() {
        let doc = laboratory(&record(json!({"id": 4, "name": "Soils", "slug": "soils"}))).unwrap();
        assert_eq!(doc.name, "Soils");
        assert_eq!(doc.slug, "soils");
    }

    #[test]
    fn test_resource_defaults() {
        let doc = resource(&record(json!({"id": 5, "title": "Sampling guide"}))).unwrap();
        assert_eq!(doc.description, "");
        assert_eq!(doc.resource_type, "");
    }

    #[test]
    fn test_video_keeps_url() {
        let doc = video(&record(json!({
            "id": 6,
            "title": "2025 Agronomy Seminar",
            "youtube_url": "https://www.youtube.com/watch?v=GLLGFD66Pgk",
        })))
        .unwrap();
        assert_eq!(doc.youtube_url, "https://www.youtube.com/watch?v=GLLGFD66Pgk");
        assert_eq!(doc.description, "");
    }

    #[test]
    fn test_team_member_null_title() {
        let doc = team_member(&record(json!({"id": "tm-1", "name": "Ana", "title": null}))).unwrap();
        assert_eq!(doc.id, DocumentId::Text("tm-1".into()));
        assert_eq!(doc.title, "");
    }

    #[test]
    fn test_missing_id_is_fatal() {
        let err = blog_post(&record(json!({"title": "orphan"}))).unwrap_err();
        assert_eq!(
            err,
            TransformError::MissingId {
                content_type: "blog-post"
            }
        );
    }

    #[test]
    fn test_malformed_relation_is_reported() {
        let err = blog_post(&record(json!({"id": 1, "tags": {"name": "soil"}}))).unwrap_err();
        assert!(matches!(err, TransformError::MalformedRelation { .. }));
    }
}
