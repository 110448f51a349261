//! Session cache in front of a [`DataProvider`].
//!
//! Three independent memoization tables:
//!
//! - the constant "all categories" listing
//! - category id → prompt summaries
//! - prompt id → prompt detail
//!
//! Entries live for the lifetime of the [`CachedProvider`] and are never
//! evicted or invalidated. The catalog is assumed immutable while the session
//! runs; if the backing files or API change underneath, the session keeps
//! serving what it saw first until restarted.
//!
//! Failures are never cached, so a retry always reaches the provider again.
//! Two concurrent misses for the same key may both call the provider; the
//! provider is idempotent, so the second insert simply overwrites an equal
//! value.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::models::{Category, PromptDetail, PromptSummary, SearchResult};
use crate::provider::{DataProvider, ProviderResult, searchable_query};

#[derive(Debug, Default)]
struct Tables {
    categories: Option<Vec<Category>>,
    prompts_by_category: HashMap<String, Vec<PromptSummary>>,
    details: HashMap<String, PromptDetail>,
}

/// Memoizing wrapper around any data provider
pub struct CachedProvider<P> {
    inner: P,
    tables: Mutex<Tables>,
}

impl<P: DataProvider> CachedProvider<P> {
    pub fn new(inner: P) -> Self {
        Self { inner, tables: Mutex::new(Tables::default()) }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        // Tables hold plain data; a panic mid-insert cannot leave them inconsistent
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of cached entries across all three tables
    pub fn cached_entries(&self) -> usize {
        let tables = self.tables();
        usize::from(tables.categories.is_some())
            + tables.prompts_by_category.len()
            + tables.details.len()
    }
}

#[async_trait]
impl<P: DataProvider> DataProvider for CachedProvider<P> {
    async fn list_categories(&self) -> ProviderResult<Vec<Category>> {
        if let Some(categories) = self.tables().categories.clone() {
            debug!("Category listing served from cache");
            return Ok(categories);
        }

        let categories = self.inner.list_categories().await?;
        self.tables().categories = Some(categories.clone());
        Ok(categories)
    }

    async fn list_prompts_by_category(
        &self,
        category_id: &str,
    ) -> ProviderResult<Vec<PromptSummary>> {
        if let Some(prompts) = self.tables().prompts_by_category.get(category_id).cloned() {
            debug!(category_id, "Prompt listing served from cache");
            return Ok(prompts);
        }

        let prompts = self.inner.list_prompts_by_category(category_id).await?;
        self.tables().prompts_by_category.insert(category_id.to_string(), prompts.clone());
        Ok(prompts)
    }

    async fn get_prompt_detail(&self, prompt_id: &str) -> ProviderResult<PromptDetail> {
        if let Some(detail) = self.tables().details.get(prompt_id).cloned() {
            debug!(prompt_id, "Prompt detail served from cache");
            return Ok(detail);
        }

        let detail = self.inner.get_prompt_detail(prompt_id).await?;
        self.tables().details.insert(prompt_id.to_string(), detail.clone());
        Ok(detail)
    }

    async fn search(&self, query: &str) -> ProviderResult<Vec<SearchResult>> {
        if searchable_query(query).is_none() {
            return Ok(Vec::new());
        }
        self.inner.search(query).await
    }
}
