use std::time::{Duration, Instant};

use tracing::debug;

use super::command::{Command, RequestId};
use super::navigation::Load;
use crate::models::SearchResult;
use crate::provider::{ProviderError, ProviderResult, searchable_query};

/// Delay between the last keystroke and dispatching a content search
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Limit search query length to keep input bounded
pub const MAX_QUERY_LEN: usize = 256;

/// How the current query is interpreted on the home view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// No query: unfiltered category grid
    Empty,
    /// Below the search threshold: category names filtered locally
    LocalFilter,
    /// Cross-catalog content search through the provider
    Content,
}

/// Owns the query string, its debounce timer and the search results
#[derive(Debug)]
pub struct SearchController {
    query: String,
    debounce: Duration,
    due_at: Option<Instant>,
    results: Load<Vec<SearchResult>>,
    /// Trimmed query the current `results` (pending or ready) belong to
    results_for: Option<String>,
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl SearchController {
    pub fn new(debounce: Duration) -> Self {
        Self { query: String::new(), debounce, due_at: None, results: Load::Idle, results_for: None }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &Load<Vec<SearchResult>> {
        &self.results
    }

    pub fn mode(&self) -> QueryMode {
        if self.query.trim().is_empty() {
            QueryMode::Empty
        } else if searchable_query(&self.query).is_none() {
            QueryMode::LocalFilter
        } else {
            QueryMode::Content
        }
    }

    /// Whether a content search is waiting for its debounce delay
    pub fn is_dispatch_pending(&self) -> bool {
        self.due_at.is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.due_at
    }

    /// Replace the query. Content queries are (re)scheduled; anything shorter
    /// cancels the pending dispatch and drops any results.
    pub fn set_query(&mut self, query: &str, now: Instant) {
        self.query = query.chars().take(MAX_QUERY_LEN).collect();

        match searchable_query(&self.query) {
            None => self.reset_results(),
            Some(trimmed) if self.results_for.as_deref() == Some(trimmed) => {
                // Only whitespace changed; current results still answer this query
                self.due_at = None;
            }
            Some(_) => {
                self.results = Load::Idle;
                self.results_for = None;
                self.due_at = Some(now + self.debounce);
            }
        }
    }

    pub fn push_char(&mut self, c: char, now: Instant) {
        if self.query.chars().count() < MAX_QUERY_LEN {
            let mut query = self.query.clone();
            query.push(c);
            self.set_query(&query, now);
        }
    }

    pub fn pop_char(&mut self, now: Instant) {
        let mut query = self.query.clone();
        if query.pop().is_some() {
            self.set_query(&query, now);
        }
    }

    /// Empty the query, cancelling any pending dispatch
    pub fn clear(&mut self) {
        self.query.clear();
        self.reset_results();
    }

    fn reset_results(&mut self) {
        self.due_at = None;
        self.results = Load::Idle;
        self.results_for = None;
    }

    /// Dispatch the debounced search once its delay has elapsed
    pub fn poll(&mut self, now: Instant, request: impl FnOnce() -> RequestId) -> Option<Command> {
        match self.due_at {
            Some(due) if now >= due => self.dispatch(request()),
            _ => None,
        }
    }

    /// Dispatch immediately, bypassing the debounce (used by retry)
    pub fn dispatch(&mut self, request: RequestId) -> Option<Command> {
        self.due_at = None;
        let query = searchable_query(&self.query)?.to_string();

        self.results = Load::Loading(request);
        self.results_for = Some(query.clone());
        Some(Command::Search { request, query })
    }

    /// Apply a search response if it answers the in-flight request for the
    /// current query; anything else is stale and dropped.
    pub fn apply(
        &mut self,
        request: RequestId,
        query: &str,
        result: ProviderResult<Vec<SearchResult>>,
    ) -> bool {
        let current = searchable_query(&self.query);
        if !self.results.is_pending(request)
            || current != Some(query)
            || self.results_for.as_deref() != Some(query)
        {
            debug!(request = request.value(), query, "Discarding stale search results");
            return false;
        }

        self.results = match result {
            // Validation failures are "no results yet", never an error banner
            Err(ProviderError::Validation(_)) => Load::Ready(Vec::new()),
            other => Load::from_result(other),
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::command::RequestIds;
    use crate::models::PromptSummary;
    use crate::provider::MIN_QUERY_LEN;

    fn result(id: &str) -> SearchResult {
        SearchResult {
            prompt: PromptSummary {
                id: id.to_string(),
                category_id: "coding".to_string(),
                title: id.to_string(),
                description: String::new(),
                tags: vec![],
            },
            category_name: "Coding".to_string(),
        }
    }

    #[test]
    fn test_mode_by_query_length() {
        let now = Instant::now();
        let mut search = SearchController::default();
        assert_eq!(search.mode(), QueryMode::Empty);

        search.set_query("c", now);
        assert_eq!(search.mode(), QueryMode::LocalFilter);

        search.set_query("co", now);
        assert_eq!(search.mode(), QueryMode::Content);

        search.set_query("   ", now);
        assert_eq!(search.mode(), QueryMode::Empty);
    }

    #[test]
    fn test_short_query_never_schedules() {
        let now = Instant::now();
        let mut ids = RequestIds::default();
        let mut search = SearchController::default();

        search.set_query("c", now);

        assert!(!search.is_dispatch_pending());
        assert_eq!(search.poll(now + Duration::from_secs(5), || ids.next()), None);
    }

    #[test]
    fn test_debounce_delays_dispatch() {
        let now = Instant::now();
        let mut ids = RequestIds::default();
        let mut search = SearchController::new(Duration::from_millis(300));

        search.set_query("code", now);

        assert_eq!(search.poll(now + Duration::from_millis(299), || ids.next()), None);
        let command = search.poll(now + Duration::from_millis(300), || ids.next()).unwrap();
        assert!(matches!(command, Command::Search { ref query, .. } if query == "code"));
        assert!(!search.is_dispatch_pending());
    }

    #[test]
    fn test_typing_restarts_debounce() {
        let start = Instant::now();
        let mut ids = RequestIds::default();
        let mut search = SearchController::new(Duration::from_millis(300));

        search.set_query("co", start);
        search.push_char('d', start + Duration::from_millis(200));

        assert_eq!(search.poll(start + Duration::from_millis(300), || ids.next()), None);
        let command = search.poll(start + Duration::from_millis(500), || ids.next()).unwrap();
        assert!(matches!(command, Command::Search { ref query, .. } if query == "cod"));
    }

    #[test]
    fn test_dispatch_uses_trimmed_query() {
        let mut ids = RequestIds::default();
        let mut search = SearchController::new(Duration::ZERO);

        search.set_query("  code ", Instant::now());
        let command = search.dispatch(ids.next()).unwrap();

        assert!(matches!(command, Command::Search { ref query, .. } if query == "code"));
    }

    #[test]
    fn test_older_response_cannot_overwrite_newer_query() {
        let now = Instant::now();
        let mut ids = RequestIds::default();
        let mut search = SearchController::new(Duration::ZERO);

        search.set_query("co", now);
        let first = ids.next();
        search.dispatch(first);
        search.set_query("code", now);
        let second = ids.next();
        search.dispatch(second);

        assert!(search.apply(second, "code", Ok(vec![result("new")])));
        assert!(!search.apply(first, "co", Ok(vec![result("old")])));

        assert_eq!(search.results().ready().unwrap()[0].prompt.id, "new");
    }

    #[test]
    fn test_response_after_clear_is_discarded() {
        let now = Instant::now();
        let mut ids = RequestIds::default();
        let mut search = SearchController::new(Duration::ZERO);
        search.set_query("code", now);
        let request = ids.next();
        search.dispatch(request);

        search.clear();

        assert!(!search.apply(request, "code", Ok(vec![result("late")])));
        assert_eq!(search.results(), &Load::Idle);
        assert_eq!(search.mode(), QueryMode::Empty);
    }

    #[test]
    fn test_clear_cancels_pending_dispatch() {
        let now = Instant::now();
        let mut ids = RequestIds::default();
        let mut search = SearchController::new(Duration::from_millis(300));
        search.set_query("code", now);

        search.clear();

        assert!(!search.is_dispatch_pending());
        assert_eq!(search.poll(now + Duration::from_secs(1), || ids.next()), None);
    }

    #[test]
    fn test_whitespace_change_keeps_results() {
        let now = Instant::now();
        let mut ids = RequestIds::default();
        let mut search = SearchController::new(Duration::ZERO);
        search.set_query("code", now);
        let request = ids.next();
        search.dispatch(request);
        search.apply(request, "code", Ok(vec![result("p1")]));

        search.set_query("code ", now);

        assert!(!search.is_dispatch_pending());
        assert!(search.results().ready().is_some());
    }

    #[test]
    fn test_validation_error_means_no_results() {
        let mut ids = RequestIds::default();
        let mut search = SearchController::new(Duration::ZERO);
        search.set_query("code", Instant::now());
        let request = ids.next();
        search.dispatch(request);

        search.apply(request, "code", Err(ProviderError::Validation("bad".into())));

        assert_eq!(search.results(), &Load::Ready(vec![]));
    }

    #[test]
    fn test_query_length_limit() {
        let now = Instant::now();
        let mut search = SearchController::default();

        search.set_query(&"a".repeat(MAX_QUERY_LEN + 10), now);
        assert_eq!(search.query().chars().count(), MAX_QUERY_LEN);

        search.push_char('b', now);
        assert_eq!(search.query().chars().count(), MAX_QUERY_LEN);
        assert!(!search.query().ends_with('b'));
    }

    #[test]
    fn test_pop_char_below_threshold_drops_results() {
        let now = Instant::now();
        let mut ids = RequestIds::default();
        let mut search = SearchController::new(Duration::ZERO);
        search.set_query("co", now);
        let request = ids.next();
        search.dispatch(request);
        search.apply(request, "co", Ok(vec![result("p1")]));

        search.pop_char(now);

        assert_eq!(search.query(), "c");
        assert_eq!(search.results(), &Load::Idle);
        assert!(search.query().chars().count() < MIN_QUERY_LEN);
    }
}
