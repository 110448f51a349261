//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

/// Builder for on-disk catalog directories
pub struct CatalogDirBuilder {
    temp_dir: TempDir,
    categories: Vec<Value>,
}

impl CatalogDirBuilder {
    /// Create a new builder with no categories
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir, categories: Vec::new() }
    }

    /// Get the catalog root
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Add a category and write its prompts file
    pub fn with_category(mut self, id: &str, name: &str, prompts: &[PromptBuilder]) -> Self {
        self.categories.push(json!({
            "id": id,
            "name": name,
            "description": format!("{} prompts", name),
            "icon": "📁",
            "promptCount": prompts.len(),
            "color": "blue",
        }));

        let records: Vec<Value> = prompts.iter().map(PromptBuilder::to_json).collect();
        self.write_prompts_raw(id, &serde_json::to_string_pretty(&records).unwrap());
        self
    }

    /// Add a category listed in categories.json with no prompts file at all
    pub fn with_empty_category(mut self, id: &str, name: &str) -> Self {
        self.categories.push(json!({ "id": id, "name": name }));
        self
    }

    /// Write arbitrary content as a category's prompts file
    pub fn with_raw_prompts(self, category_id: &str, content: &str) -> Self {
        self.write_prompts_raw(category_id, content);
        self
    }

    fn write_prompts_raw(&self, category_id: &str, content: &str) {
        let dir = self.prompts_dir();
        fs::create_dir_all(&dir).expect("Failed to create prompts dir");
        fs::write(dir.join(format!("{}.json", category_id)), content)
            .expect("Failed to write prompts file");
    }

    pub fn prompts_dir(&self) -> PathBuf {
        self.temp_dir.path().join("prompts")
    }

    /// Write categories.json and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        let content = serde_json::to_string_pretty(&self.categories).unwrap();
        fs::write(self.temp_dir.path().join("categories.json"), content)
            .expect("Failed to write categories.json");
        self.temp_dir
    }
}

impl Default for CatalogDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for prompt records stored in `prompts/<category>.json`
pub struct PromptBuilder {
    id: String,
    title: String,
    description: String,
    tags: Vec<String>,
    full_description: String,
    content: String,
}

impl PromptBuilder {
    /// Create a prompt with default text derived from its id
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: format!("Prompt {}", id),
            description: String::new(),
            tags: Vec::new(),
            full_description: String::new(),
            content: format!("Template body for {}", id),
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn full_description(mut self, text: &str) -> Self {
        self.full_description = text.to_string();
        self
    }

    pub fn content(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self
    }

    /// Convert to the stored JSON shape (category id comes from the file name)
    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "description": self.description,
            "tags": self.tags,
            "fullDescription": self.full_description,
            "content": self.content,
        })
    }
}

/// Two-category catalog used by most tests
///
/// - `coding`: `code-review` (tags rust, quality), `refactor`
/// - `marketing`: `launch-email` (tag email)
/// - `empty`: listed, no prompts file
pub fn sample_catalog() -> TempDir {
    CatalogDirBuilder::new()
        .with_category(
            "coding",
            "Coding",
            &[
                PromptBuilder::new("code-review")
                    .title("Code Review Checklist")
                    .description("Thorough review of a pull request")
                    .tags(&["rust", "quality"])
                    .full_description("Walks through correctness, naming and tests.")
                    .content("Review the following code:\n\n{{code}}"),
                PromptBuilder::new("refactor")
                    .title("Refactor Plan")
                    .description("Break a large change into safe steps"),
            ],
        )
        .with_category(
            "marketing",
            "Marketing",
            &[PromptBuilder::new("launch-email")
                .title("Launch Email")
                .description("Announce a product launch")
                .tags(&["email"])
                .content("Write a launch email for {{product}}")],
        )
        .with_empty_category("empty", "Empty Shelf")
        .build()
}
