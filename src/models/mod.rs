//! Data models for the prompt catalog.
//!
//! This module defines the data structures used throughout the application:
//!
//! - [`Category`] - A named grouping of prompts
//! - [`PromptSummary`] - Lightweight prompt shape used by listings and search
//! - [`PromptDetail`] - Full prompt including the copyable template body
//! - [`SearchResult`] - A summary enriched with its category's display name
//!
//! All models deserialize from the catalog's camelCase JSON and are read-only
//! for the lifetime of a session.

pub mod category;
pub mod prompt;

pub use category::Category;
pub use prompt::{PromptDetail, PromptSummary, SearchResult};
