//! Data providers for the prompt catalog.
//!
//! A [`DataProvider`] answers the four read-only catalog queries. Two
//! implementations exist:
//!
//! - [`FileProvider`] - reads the static JSON files from a catalog directory
//! - [`HttpProvider`] - talks to the catalog's `/api/*` endpoints
//!
//! Both are usually wrapped in [`crate::cache::CachedProvider`] so repeated
//! lookups within a session never reach the backing source twice.

pub mod file;
pub mod http;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use file::FileProvider;
pub use http::HttpProvider;

use crate::models::{Category, PromptDetail, PromptSummary, SearchResult};

/// Minimum query length (in characters, after trimming) that reaches a backing search
pub const MIN_QUERY_LEN: usize = 2;

/// Kind of entity an identifier failed to resolve to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Catalog,
    Category,
    Prompt,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Catalog => write!(f, "Catalog"),
            EntityKind::Category => write!(f, "Category"),
            EntityKind::Prompt => write!(f, "Prompt"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },
    #[error("Failed to read {path}: {reason}")]
    Io { path: String, reason: String },
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Invalid query: {0}")]
    Validation(String),
}

impl ProviderError {
    pub fn category_not_found(id: impl Into<String>) -> Self {
        ProviderError::NotFound { kind: EntityKind::Category, id: id.into() }
    }

    pub fn prompt_not_found(id: impl Into<String>) -> Self {
        ProviderError::NotFound { kind: EntityKind::Prompt, id: id.into() }
    }

    /// Whether re-issuing the same request could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::Io { .. } | ProviderError::Transport(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound { .. })
    }
}

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Returns the trimmed query if it is long enough to reach a backing search
pub fn searchable_query(query: &str) -> Option<&str> {
    let trimmed = query.trim();
    if trimmed.chars().count() < MIN_QUERY_LEN { None } else { Some(trimmed) }
}

/// Read-only, idempotent access to the catalog
#[async_trait]
pub trait DataProvider: Send + Sync {
    async fn list_categories(&self) -> ProviderResult<Vec<Category>>;

    /// Fails with `NotFound` for unknown categories; a known category with no
    /// prompts yields an empty vector.
    async fn list_prompts_by_category(&self, category_id: &str)
    -> ProviderResult<Vec<PromptSummary>>;

    async fn get_prompt_detail(&self, prompt_id: &str) -> ProviderResult<PromptDetail>;

    /// Queries shorter than [`MIN_QUERY_LEN`] return an empty vector without
    /// touching the backing source.
    async fn search(&self, query: &str) -> ProviderResult<Vec<SearchResult>>;
}

#[async_trait]
impl<T: DataProvider + ?Sized> DataProvider for Arc<T> {
    async fn list_categories(&self) -> ProviderResult<Vec<Category>> {
        (**self).list_categories().await
    }

    async fn list_prompts_by_category(
        &self,
        category_id: &str,
    ) -> ProviderResult<Vec<PromptSummary>> {
        (**self).list_prompts_by_category(category_id).await
    }

    async fn get_prompt_detail(&self, prompt_id: &str) -> ProviderResult<PromptDetail> {
        (**self).get_prompt_detail(prompt_id).await
    }

    async fn search(&self, query: &str) -> ProviderResult<Vec<SearchResult>> {
        (**self).search(query).await
    }
}
