//! Cross-origin allow-list.
//!
//! An [`OriginAllowList`] holds two lists loaded once at startup:
//!
//! - **exact origins**: compared byte-for-byte (case-sensitive), order
//!   irrelevant.
//! - **origin patterns**: literal origins in which `*` stands for one
//!   subdomain label, e.g. `https://*.example.com`.
//!
//! # Matching
//!
//! 1. No `Origin` header → rejected.
//! 2. Exact hit → the origin is returned unchanged.
//! 3. Patterns are tried in configured order; the first whose anchored
//!    matcher accepts the whole origin returns it unchanged.
//! 4. Otherwise → rejected.
//!
//! Patterns are compiled into anchored regular expressions when the list is
//! built, never per request. Every character is literal except `*`, which
//! becomes `[^.]+` (one or more characters, none of them a dot).
//!
//! ```rust
//! use content_gate_core::OriginAllowList;
//!
//! let allow = OriginAllowList::new(
//!     ["http://localhost:3000"],
//!     ["https://*.example.com"],
//! ).unwrap();
//!
//! assert_eq!(allow.validate(Some("https://app.example.com")).as_deref(), Some("https://app.example.com"));
//! assert_eq!(allow.validate(Some("https://a.b.example.com")), None);
//! assert_eq!(allow.validate(None), None);
//! ```

use regex::Regex;
use std::collections::HashSet;

use crate::error::OriginError;

/// Regex fragment a `*` expands to: one label, no dots.
const WILDCARD_SEGMENT: &str = "[^.]+";

/// A wildcard origin pattern compiled to an anchored matcher.
#[derive(Debug, Clone)]
pub struct OriginPattern {
    source: String,
    matcher: Regex,
}

impl OriginPattern {
    /// Compile a wildcard pattern such as `https://*.example.com`.
    pub fn compile(pattern: &str) -> Result<Self, OriginError> {
        if pattern.trim().is_empty() {
            return Err(OriginError::EmptyPattern);
        }

        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(WILDCARD_SEGMENT);

        let matcher =
            Regex::new(&format!("^{}$", body)).map_err(|source| OriginError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;

        Ok(Self {
            source: pattern.to_string(),
            matcher,
        })
    }

    /// The pattern as configured.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True when the whole origin matches this pattern.
    pub fn matches(&self, origin: &str) -> bool {
        self.matcher.is_match(origin)
    }
}

/// Process-wide origin allow-list. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct OriginAllowList {
    exact: HashSet<String>,
    patterns: Vec<OriginPattern>,
}

impl OriginAllowList {
    /// Build the allow-list, compiling every pattern up front.
    ///
    /// Fails on the first pattern that cannot be compiled. A pattern listed
    /// twice is compiled once and keeps its first position.
    pub fn new<E, P>(exact: E, patterns: P) -> Result<Self, OriginError>
    where
        E: IntoIterator,
        E::Item: Into<String>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let exact: HashSet<String> = exact.into_iter().map(Into::into).collect();

        let mut compiled: Vec<OriginPattern> = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            if compiled.iter().any(|p| p.as_str() == pattern) {
                continue;
            }
            compiled.push(OriginPattern::compile(pattern)?);
        }

        tracing::debug!(
            exact = exact.len(),
            patterns = compiled.len(),
            "origin allow-list built"
        );

        Ok(Self {
            exact,
            patterns: compiled,
        })
    }

    /// Decide whether `origin` may receive cross-origin responses.
    ///
    /// Returns the origin, unchanged, for reflection into
    /// `Access-Control-Allow-Origin`, or `None` when the caller is not
    /// authorized (including when the request carried no `Origin` header).
    pub fn validate(&self, origin: Option<&str>) -> Option<String> {
        let origin = origin?;

        if self.exact.contains(origin) {
            return Some(origin.to_string());
        }

        self.patterns
            .iter()
            .find(|p| p.matches(origin))
            .map(|_| origin.to_string())
    }

    /// True when [`validate`](Self::validate) would authorize `origin`.
    pub fn allows(&self, origin: &str) -> bool {
        self.validate(Some(origin)).is_some()
    }

    /// The exact origins, in no particular order.
    pub fn exact_origins(&self) -> impl Iterator<Item = &str> {
        self.exact.iter().map(String::as_str)
    }

    /// The compiled patterns, in configured order.
    pub fn patterns(&self) -> &[OriginPattern] {
        &self.patterns
    }
}

/// Free-function form of [`OriginAllowList::validate`].
pub fn validate_origin(origin: Option<&str>, allow: &OriginAllowList) -> Option<String> {
    allow.validate(origin)
}
