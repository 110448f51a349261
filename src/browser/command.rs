use tracing::info;

use crate::models::{Category, PromptDetail, PromptSummary, SearchResult};
use crate::provider::{DataProvider, ProviderError, ProviderResult};

/// Tag attached to every outstanding request so late responses can be
/// recognised and discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Monotonic request id source, one per browser session
#[derive(Debug, Default)]
pub struct RequestIds {
    issued: u64,
}

impl RequestIds {
    pub fn next(&mut self) -> RequestId {
        self.issued += 1;
        RequestId(self.issued)
    }
}

/// Side effect requested by a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    LoadCategories { request: RequestId },
    LoadCategoryPrompts { request: RequestId, category_id: String },
    Search { request: RequestId, query: String },
    LoadPromptDetail { request: RequestId, prompt_id: String },
    /// Handled by the UI loop itself, never by a provider
    CopyToClipboard { text: String },
}

impl Command {
    pub fn request(&self) -> Option<RequestId> {
        match self {
            Command::LoadCategories { request }
            | Command::LoadCategoryPrompts { request, .. }
            | Command::Search { request, .. }
            | Command::LoadPromptDetail { request, .. } => Some(*request),
            Command::CopyToClipboard { .. } => None,
        }
    }

    /// Outcome reporting `err` for this command, used when the task running
    /// it died before producing one
    pub fn into_failure(self, err: ProviderError) -> Option<Outcome> {
        let outcome = match self {
            Command::LoadCategories { request } => {
                Outcome::CategoriesLoaded { request, result: Err(err) }
            }
            Command::LoadCategoryPrompts { request, category_id } => {
                Outcome::CategoryPromptsLoaded { request, category_id, result: Err(err) }
            }
            Command::Search { request, query } => {
                Outcome::SearchCompleted { request, query, result: Err(err) }
            }
            Command::LoadPromptDetail { request, prompt_id } => {
                Outcome::PromptDetailLoaded { request, prompt_id, result: Err(err) }
            }
            Command::CopyToClipboard { .. } => return None,
        };
        Some(outcome)
    }
}

/// Completed provider call, fed back into the browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    CategoriesLoaded {
        request: RequestId,
        result: ProviderResult<Vec<Category>>,
    },
    CategoryPromptsLoaded {
        request: RequestId,
        category_id: String,
        result: ProviderResult<Vec<PromptSummary>>,
    },
    SearchCompleted {
        request: RequestId,
        query: String,
        result: ProviderResult<Vec<SearchResult>>,
    },
    PromptDetailLoaded {
        request: RequestId,
        prompt_id: String,
        result: ProviderResult<PromptDetail>,
    },
}

/// Run a provider-bound command. Returns `None` for commands the UI handles.
pub async fn execute<P: DataProvider + ?Sized>(provider: &P, command: Command) -> Option<Outcome> {
    let outcome = match command {
        Command::LoadCategories { request } => {
            info!(request = request.value(), "Loading categories");
            let result = provider.list_categories().await;
            Outcome::CategoriesLoaded { request, result }
        }
        Command::LoadCategoryPrompts { request, category_id } => {
            info!(request = request.value(), %category_id, "Loading category prompts");
            let result = provider.list_prompts_by_category(&category_id).await;
            Outcome::CategoryPromptsLoaded { request, category_id, result }
        }
        Command::Search { request, query } => {
            info!(request = request.value(), %query, "Searching prompts");
            let result = provider.search(&query).await;
            Outcome::SearchCompleted { request, query, result }
        }
        Command::LoadPromptDetail { request, prompt_id } => {
            info!(request = request.value(), %prompt_id, "Loading prompt detail");
            let result = provider.get_prompt_detail(&prompt_id).await;
            Outcome::PromptDetailLoaded { request, prompt_id, result }
        }
        Command::CopyToClipboard { .. } => return None,
    };
    Some(outcome)
}
