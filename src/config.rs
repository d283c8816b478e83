use crate::error::Error;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for one page-object generation run
///
/// Parsed from a markdown document containing case-insensitive
/// `key: value` lines. Immutable after creation; a document missing
/// `url` or `page_name` is a terminal configuration error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Target page URL
    pub url: String,

    /// Name for the generated page object (identifier-ish)
    pub page_name: String,

    /// Free-form description of the page (may be empty)
    #[serde(default)]
    pub description: String,
}

impl GenerationConfig {
    /// Parse a configuration from markdown text.
    ///
    /// Recognized lines are `url:`, `page_name:` (also `page name:`) and
    /// `description:`, matched case-insensitively anywhere in the document.
    /// Only the first match per key is used and captured values are trimmed.
    /// Multi-line values are not supported.
    pub fn from_markdown(content: &str) -> Result<Self, Error> {
        let config = Self {
            url: capture_field(content, r"(?i)url:\s*(.+)"),
            page_name: capture_field(content, r"(?i)page[_\s]?name:\s*(.+)"),
            description: capture_field(content, r"(?i)description:\s*(.+)"),
        };

        let mut missing = Vec::new();
        if config.url.is_empty() {
            missing.push("url".to_string());
        }
        if config.page_name.is_empty() {
            missing.push("page_name".to_string());
        }
        if !missing.is_empty() {
            return Err(Error::Configuration { missing });
        }

        Ok(config)
    }

    /// Load and parse a configuration from a markdown file on disk
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_markdown(&content)
    }

    /// Directory segment for generated artifacts (lower-cased page name)
    pub fn dir_name(&self) -> String {
        self.page_name.to_lowercase()
    }

    /// Name of the generated page-object class (`Widget` -> `WidgetPage`)
    pub fn class_name(&self) -> String {
        let mut chars = self.page_name.chars();
        match chars.next() {
            Some(first) => format!("{}{}Page", first.to_uppercase(), chars.as_str()),
            None => "Page".to_string(),
        }
    }
}

/// Returns the trimmed first capture of `pattern` in `content`, or an empty
/// string when the pattern does not match
fn capture_field(content: &str, pattern: &str) -> String {
    let re = Regex::new(pattern).expect("field pattern should be valid");
    re.captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}
