use serde::{Deserialize, Serialize};

/// Summary shown when the encyclopedia has no page for the query.
pub const NO_SUMMARY: &str = "No Wikipedia summary available.";

/// Marker that opens the first section heading in a plain-text extract.
const SECTION_MARKER: &str = "==";

/// A page returned by an encyclopedia client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub title: String,
    /// Plain-text extract; may still contain `== Heading ==` markers.
    pub summary: String,
    /// Canonical URL of the page.
    pub full_url: String,
}

/// Encyclopedia section of a resolution.
///
/// When no page was found, or the lookup failed, `summary` carries the
/// message to show and both optional fields are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncyclopediaEntry {
    pub summary: String,
    pub page_url: Option<String>,
    /// The query that found the page. Used as the database name fallback.
    pub resolved_query_name: Option<String>,
}

impl EncyclopediaEntry {
    /// Entry for a page that exists, keeping only the text before the first
    /// section heading.
    pub fn from_page(page: &Page, query: &str) -> Self {
        Self {
            summary: lead_section(&page.summary).to_string(),
            page_url: Some(page.full_url.clone()),
            resolved_query_name: Some(query.to_string()),
        }
    }

    pub fn not_found() -> Self {
        Self {
            summary: NO_SUMMARY.to_string(),
            page_url: None,
            resolved_query_name: None,
        }
    }

    pub fn lookup_failed(error: impl std::fmt::Display) -> Self {
        Self {
            summary: format!("Error retrieving Wikipedia data: {}", error),
            page_url: None,
            resolved_query_name: None,
        }
    }

    pub fn is_found(&self) -> bool {
        self.page_url.is_some()
    }
}

/// Text before the first `==` marker, trimmed.
pub fn lead_section(text: &str) -> &str {
    text.split(SECTION_MARKER).next().unwrap_or_default().trim()
}
