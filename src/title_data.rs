/// Data structures for Tab Title Keeper
use serde::{Deserialize, Serialize};

/// How much of a URL a saved title applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// The full URL, query and fragment included
    Exact,
    /// Origin + path
    Path,
    /// Hostname only
    Domain,
}

impl MatchType {
    pub const ALL: [MatchType; 3] = [MatchType::Exact, MatchType::Path, MatchType::Domain];

    /// Higher wins when several saved titles match one URL
    pub fn priority(self) -> u8 {
        match self {
            MatchType::Exact => 3,
            MatchType::Path => 2,
            MatchType::Domain => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchType::Exact => "Exact",
            MatchType::Path => "Path",
            MatchType::Domain => "Domain",
        }
    }

    /// Parses the wire/form value ("exact", "path", "domain")
    pub fn from_value(value: &str) -> Option<MatchType> {
        match value {
            "exact" => Some(MatchType::Exact),
            "path" => Some(MatchType::Path),
            "domain" => Some(MatchType::Domain),
            _ => None,
        }
    }

    pub fn value(self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::Path => "path",
            MatchType::Domain => "domain",
        }
    }
}

/// A saved title override
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Override {
    pub id: String,
    #[serde(rename = "url")]
    pub url_key: String,
    pub title: String,
    pub match_type: MatchType,
    pub original_title: String,
    pub created_at: f64,
}

/// Information about the active browser tab, as the popup sees it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    pub tab_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(default, alias = "isModified")]
    pub is_enforced: bool,
}

impl TabInfo {
    pub fn new(tab_id: i32, url: String, title: String) -> TabInfo {
        TabInfo {
            url,
            title,
            tab_id,
            original_title: None,
            is_enforced: false,
        }
    }

    /// The title the page had before any override, falling back to the tab title
    pub fn best_original_title(&self) -> &str {
        self.original_title.as_deref().unwrap_or(&self.title)
    }
}

/// Snapshot of a page's title state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TitleStatus {
    pub original_title: String,
    pub current_title: String,
    #[serde(alias = "isModified")]
    pub is_enforced: bool,
}
