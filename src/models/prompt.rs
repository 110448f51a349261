use serde::{Deserialize, Serialize};

/// Listing/search representation of a prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptSummary {
    pub id: String,
    #[serde(default)]
    pub category_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Display order matters; duplicates are kept as-is
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PromptSummary {
    /// Case-insensitive substring match over title, short description and tags.
    ///
    /// `needle` must already be lowercased; callers lowercase the query once
    /// and test many prompts against it.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
    }
}

/// Fully hydrated prompt, only obtainable by id lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptDetail {
    #[serde(flatten)]
    pub summary: PromptSummary,
    #[serde(default)]
    pub full_description: String,
    /// Template body copied verbatim by the user
    pub content: String,
}

impl PromptDetail {
    pub fn id(&self) -> &str {
        &self.summary.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(flatten)]
    pub prompt: PromptSummary,
    pub category_name: String,
}
