//! # Content Gate
//!
//! The boundary layer between a headless CMS, browser clients, and an
//! external full-text search service.
//!
//! Content Gate does two things:
//!
//! - **Admission**: decides which cross-origin callers get CORS headers,
//!   using an exact + wildcard origin allow-list.
//! - **Index sync**: turns populated CMS records into flat search
//!   documents, one pipeline per content type, and pushes them to the
//!   search service.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐  Origin  ┌─────────────┐
//! │ Browser  │─────────▶│ CORS layer  │──▶ API routes
//! └──────────┘          └─────────────┘
//!
//! ┌──────────┐  record  ┌─────────────┐  document  ┌──────────────┐
//! │   CMS    │─────────▶│  Transform  │───────────▶│ Search index │
//! └──────────┘  event   └─────────────┘   upsert   └──────────────┘
//! ```
//!
//! The decision logic itself lives in [`content_gate_core`]; this crate
//! wires it into configuration, HTTP, and the search service client.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML + environment configuration |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`cors`] | CORS layer driven by the origin allow-list |
//! | [`search_client`] | Search service trait and HTTP client |
//! | [`sync`] | Record loading, transform, and sync events |
//! | [`indexes`] | Index settings listing and configuration push |
//! | [`server`] | Axum HTTP server |

pub mod config;
pub mod cors;
pub mod indexes;
pub mod logging;
pub mod search_client;
pub mod server;
pub mod sync;
