//! Shared types for the daily job digest.
//!
//! Holds the posting model plus the pure pieces of a run: freshness
//! classification, de-duplication and report rendering.

pub mod dedupe;
pub mod freshness;
pub mod report;

pub use dedupe::dedupe;
pub use freshness::{is_posted_on, is_posted_today};
pub use report::{ReportSection, render_report, render_section};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder used when the provider gives no apply link.
pub const NO_APPLY_LINK: &str = "No apply link";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    /// Free-form text straight from the provider ("3 hours ago", "Today", a date...).
    pub posted_at: Option<String>,
    pub apply_url: String,
}

impl JobPosting {
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        location: impl Into<String>,
        posted_at: Option<String>,
        apply_url: Option<String>,
    ) -> Self {
        Self {
            title: title.into(),
            company: company.into(),
            location: location.into(),
            posted_at,
            apply_url: apply_url
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| NO_APPLY_LINK.to_string()),
        }
    }
}

/// One search term, trimmed and never empty.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct RoleQuery(String);

impl RoleQuery {
    /// Returns `None` when the input is blank after trimming.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Splits a comma-separated list, dropping blank entries.
    pub fn parse_list(raw: &str) -> Vec<Self> {
        raw.split(',').filter_map(Self::new).collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
