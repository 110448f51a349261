//! File-backed catalog provider.
//!
//! # Layout
//!
//! ```text
//! <root>/categories.json              [Category, ...]
//! <root>/prompts/<category-id>.json   [PromptDetail, ...]
//! ```
//!
//! The prompts file name is authoritative for `categoryId`; records may omit
//! it. A category listed in `categories.json` without a prompts file is a
//! valid, empty category.
//!
//! # Error Handling Strategy
//!
//! - Missing `categories.json` is `NotFound`; malformed or oversized files are `Io`
//! - Direct lookups of one category surface that category's read errors
//! - Catalog-wide scans (search, detail lookup) skip unreadable category files
//!   with a warning so one corrupted file does not hide the rest of the catalog

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{DataProvider, EntityKind, ProviderError, ProviderResult, searchable_query};
use crate::models::{Category, PromptDetail, PromptSummary, SearchResult};
use crate::utils::{is_safe_identifier, validate_file_size};

const CATEGORIES_FILENAME: &str = "categories.json";
const PROMPTS_DIRNAME: &str = "prompts";

/// Catalog stored as static JSON files under a root directory
#[derive(Debug, Clone)]
pub struct FileProvider {
    root: Arc<PathBuf>,
}

impl FileProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: Arc::new(root.into()) }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn categories_path(&self) -> PathBuf {
        self.root.join(CATEGORIES_FILENAME)
    }

    fn prompts_path(&self, category_id: &str) -> PathBuf {
        self.root.join(PROMPTS_DIRNAME).join(format!("{}.json", category_id))
    }

    /// Read the category listing in storage order
    pub fn read_categories(&self) -> ProviderResult<Vec<Category>> {
        let path = self.categories_path();
        read_json_file(&path)?.ok_or_else(|| ProviderError::NotFound {
            kind: EntityKind::Catalog,
            id: path.display().to_string(),
        })
    }

    /// Read every prompt stored for a category, stamping the category id
    fn read_prompt_records(&self, category_id: &str) -> ProviderResult<Vec<PromptDetail>> {
        if !is_safe_identifier(category_id) {
            warn!(category_id, "Skipping prompts for category with unsafe identifier");
            return Ok(Vec::new());
        }

        let path = self.prompts_path(category_id);
        let mut records: Vec<PromptDetail> = read_json_file(&path)?.unwrap_or_default();
        for record in &mut records {
            record.summary.category_id = category_id.to_string();
        }
        Ok(records)
    }

    /// Known categories always succeed; one whose id cannot name a file is empty
    pub fn read_category_prompts(&self, category_id: &str) -> ProviderResult<Vec<PromptSummary>> {
        let categories = self.read_categories()?;
        if !categories.iter().any(|c| c.id == category_id) {
            return Err(ProviderError::category_not_found(category_id));
        }

        let records = self.read_prompt_records(category_id)?;
        Ok(records.into_iter().map(|record| record.summary).collect())
    }

    /// Load every category with its prompts, in storage order.
    ///
    /// Category files are parsed in parallel; unreadable ones are skipped.
    pub fn read_catalog(&self) -> ProviderResult<Vec<(Category, Vec<PromptDetail>)>> {
        let categories = self.read_categories()?;

        let catalog = categories
            .into_par_iter()
            .map(|category| {
                let prompts = match self.read_prompt_records(&category.id) {
                    Ok(prompts) => prompts,
                    Err(e) => {
                        warn!(category = %category.id, error = %e, "Skipping unreadable prompts file");
                        Vec::new()
                    }
                };
                (category, prompts)
            })
            .collect();

        Ok(catalog)
    }

    /// Prompt ids only ever match parsed records, never a path
    pub fn find_prompt(&self, prompt_id: &str) -> ProviderResult<PromptDetail> {
        self.read_catalog()?
            .into_iter()
            .flat_map(|(_, prompts)| prompts)
            .find(|prompt| prompt.id() == prompt_id)
            .ok_or_else(|| ProviderError::prompt_not_found(prompt_id))
    }

    pub fn search_catalog(&self, query: &str) -> ProviderResult<Vec<SearchResult>> {
        let Some(query) = searchable_query(query) else {
            return Ok(Vec::new());
        };
        let needle = query.to_lowercase();

        let results: Vec<SearchResult> = self
            .read_catalog()?
            .into_iter()
            .flat_map(|(category, prompts)| {
                let needle = &needle;
                prompts.into_iter().filter(move |p| p.summary.matches_lowercase(needle)).map(
                    move |p| SearchResult {
                        prompt: p.summary,
                        category_name: category.name.clone(),
                    },
                )
            })
            .collect();

        debug!(query, matches = results.len(), "Searched catalog files");
        Ok(results)
    }
}

/// Read and parse a JSON file, returning `None` if it does not exist
fn read_json_file<T: DeserializeOwned>(path: &Path) -> ProviderResult<Option<T>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_error(path, e)),
    };

    // Validate size on the open handle to avoid TOCTOU race condition
    let parsed = validate_file_size(&file, path).and_then(|()| {
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Malformed JSON in {}", path.display()))
    });

    parsed.map(Some).map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, reason: impl std::fmt::Display) -> ProviderError {
    ProviderError::Io { path: path.display().to_string(), reason: format!("{:#}", reason) }
}

async fn run_blocking<T, F>(task: F) -> ProviderResult<T>
where
    F: FnOnce() -> ProviderResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| ProviderError::Transport(format!("File worker failed: {}", e)))?
}

#[async_trait]
impl DataProvider for FileProvider {
    async fn list_categories(&self) -> ProviderResult<Vec<Category>> {
        let store = self.clone();
        run_blocking(move || store.read_categories()).await
    }

    async fn list_prompts_by_category(
        &self,
        category_id: &str,
    ) -> ProviderResult<Vec<PromptSummary>> {
        let store = self.clone();
        let category_id = category_id.to_string();
        run_blocking(move || store.read_category_prompts(&category_id)).await
    }

    async fn get_prompt_detail(&self, prompt_id: &str) -> ProviderResult<PromptDetail> {
        let store = self.clone();
        let prompt_id = prompt_id.to_string();
        run_blocking(move || store.find_prompt(&prompt_id)).await
    }

    async fn search(&self, query: &str) -> ProviderResult<Vec<SearchResult>> {
        if searchable_query(query).is_none() {
            return Ok(Vec::new());
        }
        let store = self.clone();
        let query = query.to_string();
        run_blocking(move || store.search_catalog(&query)).await
    }
}
