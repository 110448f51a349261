//! Browsing session state machine.
//!
//! [`Browser`] owns everything a session displays: the current view, the
//! search query, the detail overlay and the fetched data backing them. It
//! performs no I/O. Every transition returns the [`Command`]s it needs run;
//! the caller executes them (see [`execute`]) and feeds each [`Outcome`] back
//! through [`Browser::apply`].
//!
//! # Staleness
//!
//! Each command carries a fresh [`RequestId`]. Outcomes are applied only if
//! the slot they target is still waiting for that exact id (and, for search,
//! that exact query; for the overlay, that exact prompt). Whatever the user
//! did last decides what is shown, regardless of completion order.
//!
//! # Example
//!
//! ```
//! use std::time::Instant;
//! use prompt_catalog::browser::{Browser, Command};
//!
//! let mut browser = Browser::default();
//! let commands = browser.start();
//! assert!(matches!(commands[0], Command::LoadCategories { .. }));
//!
//! browser.set_query("review", Instant::now());
//! assert_eq!(browser.query(), "review");
//! ```

pub mod command;
pub mod navigation;
pub mod overlay;
pub mod search;

use std::time::{Duration, Instant};

pub use command::{Command, Outcome, RequestId, RequestIds, execute};
pub use navigation::{Load, Navigation, View};
pub use overlay::{Hydration, Overlay};
pub use search::{DEFAULT_DEBOUNCE, QueryMode, SearchController};
use tracing::info;

use crate::models::{Category, PromptSummary, SearchResult};
use crate::provider::ProviderError;

/// Why a view has nothing to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    NoCategories,
    NoMatchingCategories,
    NoPrompts,
    CategoryNotFound,
    NoSearchResults,
}

impl EmptyState {
    pub fn message(self) -> &'static str {
        match self {
            EmptyState::NoCategories => "No categories available",
            EmptyState::NoMatchingCategories => "No categories match your filter",
            EmptyState::NoPrompts => "This category has no prompts yet",
            EmptyState::CategoryNotFound => "Category not found",
            EmptyState::NoSearchResults => "No prompts match your search",
        }
    }
}

/// What the main pane should show right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen<'a> {
    Loading,
    Searching(&'a str),
    /// Retryable failure; offer the retry action
    Failed(&'a ProviderError),
    Empty(EmptyState),
    Categories(Vec<&'a Category>),
    Prompts(&'a [PromptSummary]),
    SearchResults(&'a [SearchResult]),
}

impl Screen<'_> {
    /// Number of selectable rows
    pub fn len(&self) -> usize {
        match self {
            Screen::Categories(categories) => categories.len(),
            Screen::Prompts(prompts) => prompts.len(),
            Screen::SearchResults(results) => results.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Transient message for the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

/// One browsing session: navigation, search and detail overlay
#[derive(Debug)]
pub struct Browser {
    navigation: Navigation,
    search: SearchController,
    overlay: Overlay,
    requests: RequestIds,
    notice: Option<Notice>,
}

impl Default for Browser {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Browser {
    pub fn new(debounce: Duration) -> Self {
        Self {
            navigation: Navigation::default(),
            search: SearchController::new(debounce),
            overlay: Overlay::default(),
            requests: RequestIds::default(),
            notice: None,
        }
    }

    pub fn view(&self) -> &View {
        self.navigation.view()
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn query(&self) -> &str {
        self.search.query()
    }

    pub fn query_mode(&self) -> QueryMode {
        self.search.mode()
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn active_category(&self) -> Option<&Category> {
        self.navigation.active_category()
    }

    /// Earliest instant at which [`Browser::tick`] has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        self.search.next_deadline()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Initial load of the category listing
    pub fn start(&mut self) -> Vec<Command> {
        let request = self.requests.next();
        vec![self.navigation.load_categories(request)]
    }

    /// Home → category detail; clears the query and fetches the prompts
    pub fn select_category(&mut self, category_id: &str) -> Vec<Command> {
        info!(category_id, "Selecting category");
        self.search.clear();
        let request = self.requests.next();
        vec![self.navigation.select_category(category_id, request)]
    }

    /// Category detail → home; clears the category, query and prompt list
    pub fn go_back(&mut self) -> Vec<Command> {
        self.navigation.go_back();
        self.search.clear();
        Vec::new()
    }

    /// Replace the query. A searchable query typed inside a category first
    /// returns to home, since search results always belong to the home view.
    pub fn set_query(&mut self, query: &str, now: Instant) -> Vec<Command> {
        self.search.set_query(query, now);
        self.after_query_change(now)
    }

    pub fn push_char(&mut self, c: char, now: Instant) -> Vec<Command> {
        self.search.push_char(c, now);
        self.after_query_change(now)
    }

    pub fn pop_char(&mut self, now: Instant) -> Vec<Command> {
        self.search.pop_char(now);
        self.after_query_change(now)
    }

    /// Empty the query and cancel any pending search
    pub fn clear_query(&mut self) -> Vec<Command> {
        self.search.clear();
        Vec::new()
    }

    fn after_query_change(&mut self, now: Instant) -> Vec<Command> {
        if self.search.mode() == QueryMode::Content
            && matches!(self.navigation.view(), View::CategoryDetail(_))
        {
            self.navigation.go_back();
        }
        self.tick(now)
    }

    /// Dispatch a debounced search whose delay has elapsed
    pub fn tick(&mut self, now: Instant) -> Vec<Command> {
        let requests = &mut self.requests;
        self.search.poll(now, || requests.next()).into_iter().collect()
    }

    /// Open the detail overlay for a summary and start hydrating it
    pub fn open_prompt(&mut self, summary: PromptSummary) -> Vec<Command> {
        let request = self.requests.next();
        vec![self.overlay.open(summary, request)]
    }

    pub fn close_overlay(&mut self) {
        self.overlay.close();
    }

    /// Copy the open prompt's content; nothing until the detail has loaded
    pub fn copy_prompt(&self) -> Vec<Command> {
        self.overlay.copy_command().into_iter().collect()
    }

    /// Activate the row at `index` on the current screen
    pub fn activate(&mut self, index: usize) -> Vec<Command> {
        let target = match self.screen() {
            Screen::Categories(categories) => {
                categories.get(index).map(|c| Activation::Category(c.id.clone()))
            }
            Screen::Prompts(prompts) => prompts.get(index).cloned().map(Activation::Prompt),
            Screen::SearchResults(results) => {
                results.get(index).map(|r| Activation::Prompt(r.prompt.clone()))
            }
            _ => None,
        };

        match target {
            Some(Activation::Category(id)) => self.select_category(&id),
            Some(Activation::Prompt(summary)) => self.open_prompt(summary),
            None => Vec::new(),
        }
    }

    /// Re-issue whichever request backs the failure currently on screen
    pub fn retry(&mut self) -> Vec<Command> {
        let Screen::Failed(_) = self.screen() else {
            return Vec::new();
        };

        let request = self.requests.next();
        match self.navigation.view().clone() {
            View::CategoryDetail(id) => vec![self.navigation.select_category(&id, request)],
            View::Home if self.search.mode() == QueryMode::Content => {
                self.search.dispatch(request).into_iter().collect()
            }
            View::Home => vec![self.navigation.load_categories(request)],
        }
    }

    /// Feed a completed request back in. Returns false if it was stale.
    pub fn apply(&mut self, outcome: Outcome) -> bool {
        match outcome {
            Outcome::CategoriesLoaded { request, result } => {
                self.navigation.apply_categories(request, result)
            }
            Outcome::CategoryPromptsLoaded { request, category_id, result } => {
                self.navigation.apply_prompts(request, &category_id, result)
            }
            Outcome::SearchCompleted { request, query, result } => {
                self.search.apply(request, &query, result)
            }
            Outcome::PromptDetailLoaded { request, prompt_id, result } => {
                match self.overlay.apply(request, &prompt_id, result) {
                    Hydration::Applied => true,
                    Hydration::Discarded => false,
                    Hydration::Closed(err) => {
                        let text = if err.is_not_found() {
                            "Prompt is no longer available".to_string()
                        } else {
                            format!("Could not load prompt: {}", err)
                        };
                        self.notice = Some(Notice { text, is_error: true });
                        true
                    }
                }
            }
        }
    }

    pub fn screen(&self) -> Screen<'_> {
        match self.navigation.view() {
            View::CategoryDetail(_) => match self.navigation.prompts() {
                Load::Idle | Load::Loading(_) => Screen::Loading,
                Load::Ready(prompts) if prompts.is_empty() => Screen::Empty(EmptyState::NoPrompts),
                Load::Ready(prompts) => Screen::Prompts(prompts),
                Load::Failed(err) if err.is_retryable() => Screen::Failed(err),
                Load::Failed(ProviderError::NotFound { .. }) => {
                    Screen::Empty(EmptyState::CategoryNotFound)
                }
                Load::Failed(_) => Screen::Empty(EmptyState::NoPrompts),
            },
            View::Home if self.search.mode() == QueryMode::Content => match self.search.results() {
                Load::Idle | Load::Loading(_) => Screen::Searching(self.search.query().trim()),
                Load::Ready(results) if results.is_empty() => {
                    Screen::Empty(EmptyState::NoSearchResults)
                }
                Load::Ready(results) => Screen::SearchResults(results),
                Load::Failed(err) if err.is_retryable() => Screen::Failed(err),
                Load::Failed(_) => Screen::Empty(EmptyState::NoSearchResults),
            },
            View::Home => match self.navigation.categories() {
                Load::Idle | Load::Loading(_) => Screen::Loading,
                Load::Failed(err) => Screen::Failed(err),
                Load::Ready(categories) => self.category_grid(categories),
            },
        }
    }

    fn category_grid<'a>(&'a self, categories: &'a [Category]) -> Screen<'a> {
        let filter = match self.search.mode() {
            QueryMode::LocalFilter => Some(self.search.query().trim()),
            _ => None,
        };

        let visible: Vec<&Category> = categories
            .iter()
            .filter(|category| filter.is_none_or(|needle| category.name_matches(needle)))
            .collect();

        match (visible.is_empty(), filter) {
            (true, Some(_)) => Screen::Empty(EmptyState::NoMatchingCategories),
            (true, None) => Screen::Empty(EmptyState::NoCategories),
            (false, _) => Screen::Categories(visible),
        }
    }
}

enum Activation {
    Category(String),
    Prompt(PromptSummary),
}
