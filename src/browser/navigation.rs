use tracing::debug;

use super::command::{Command, RequestId};
use crate::models::{Category, PromptSummary};
use crate::provider::{ProviderError, ProviderResult};

/// Which top-level view is showing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    /// Category grid, or search results while a query is active
    #[default]
    Home,
    CategoryDetail(String),
}

/// Lifecycle of one piece of fetched data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Load<T> {
    Idle,
    Loading(RequestId),
    Ready(T),
    Failed(ProviderError),
}

impl<T> Default for Load<T> {
    fn default() -> Self {
        Load::Idle
    }
}

impl<T> Load<T> {
    /// Whether `request` is the one this slot is waiting for
    pub fn is_pending(&self, request: RequestId) -> bool {
        matches!(self, Load::Loading(pending) if *pending == request)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Load::Loading(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Load::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ProviderError> {
        match self {
            Load::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub(crate) fn from_result(result: ProviderResult<T>) -> Self {
        match result {
            Ok(value) => Load::Ready(value),
            Err(err) => Load::Failed(err),
        }
    }
}

/// Home / category-detail state machine
#[derive(Debug, Default)]
pub struct Navigation {
    view: View,
    categories: Load<Vec<Category>>,
    prompts: Load<Vec<PromptSummary>>,
}

impl Navigation {
    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn categories(&self) -> &Load<Vec<Category>> {
        &self.categories
    }

    pub fn prompts(&self) -> &Load<Vec<PromptSummary>> {
        &self.prompts
    }

    pub fn active_category_id(&self) -> Option<&str> {
        match self.view() {
            View::CategoryDetail(id) => Some(id),
            View::Home => None,
        }
    }

    /// The active category's listing entry, once categories are loaded
    pub fn active_category(&self) -> Option<&Category> {
        let id = self.active_category_id()?;
        self.categories.ready()?.iter().find(|c| c.id == id)
    }

    pub fn load_categories(&mut self, request: RequestId) -> Command {
        self.categories = Load::Loading(request);
        Command::LoadCategories { request }
    }

    pub fn apply_categories(
        &mut self,
        request: RequestId,
        result: ProviderResult<Vec<Category>>,
    ) -> bool {
        if !self.categories.is_pending(request) {
            debug!(request = request.value(), "Discarding stale category listing");
            return false;
        }
        self.categories = Load::from_result(result);
        true
    }

    /// Enter a category's detail view and request its prompts
    pub fn select_category(&mut self, category_id: &str, request: RequestId) -> Command {
        self.view = View::CategoryDetail(category_id.to_string());
        self.prompts = Load::Loading(request);
        Command::LoadCategoryPrompts { request, category_id: category_id.to_string() }
    }

    pub fn go_back(&mut self) {
        self.view = View::Home;
        self.prompts = Load::Idle;
    }

    /// Apply a prompt listing only if it answers the current category's
    /// outstanding request
    pub fn apply_prompts(
        &mut self,
        request: RequestId,
        category_id: &str,
        result: ProviderResult<Vec<PromptSummary>>,
    ) -> bool {
        if self.active_category_id() != Some(category_id) || !self.prompts.is_pending(request) {
            debug!(request = request.value(), category_id, "Discarding stale prompt listing");
            return false;
        }
        self.prompts = Load::from_result(result);
        true
    }
}
