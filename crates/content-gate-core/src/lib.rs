//! # Content Gate Core
//!
//! Pure decision logic for content-gate: the cross-origin allow-list and
//! the per-content-type search document transforms.
//!
//! This crate contains no tokio, HTTP, filesystem I/O, or other
//! runtime dependencies. Every public function is synchronous and
//! side-effect free, so the application can call it on any request
//! thread or sync task without coordination.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`origin`] | Exact + wildcard origin allow-list |
//! | [`record`] | Populated content records read from the CMS |
//! | [`flatten`] | Relation-array to search text flattening |
//! | [`document`] | Flat index documents, one struct per content type |
//! | [`transform`] | The six per-type transforms |
//! | [`content_type`] | Static content type → transform + settings dispatch |
//! | [`settings`] | Index name and attribute configuration |

pub mod content_type;
pub mod document;
pub mod error;
pub mod flatten;
pub mod origin;
pub mod record;
pub mod settings;
pub mod transform;

pub use content_type::ContentType;
pub use document::{DocumentId, IndexDocument};
pub use error::{OriginError, TransformError, UnknownContentType};
pub use origin::{validate_origin, OriginAllowList, OriginPattern};
pub use record::ContentRecord;
pub use settings::IndexSettings;
