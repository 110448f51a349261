//! Interactive browser application state and event loop.
//!
//! [`App`] wraps a [`Browser`] with what only the terminal needs: the list
//! selection, transient status messages, the clipboard and redraw tracking.
//! Browser transitions produce commands; the app queues them and, once per
//! loop iteration, sends provider-bound ones to the [`Worker`] and handles
//! clipboard copies itself.
//!
//! # Loop
//!
//! 1. Expire status messages
//! 2. Apply finished outcomes from the worker
//! 3. Fire a due debounced search
//! 4. Flush queued commands
//! 5. Draw if anything changed
//! 6. Wait for input, at most until the next search deadline

use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::layout::{Position, Rect};

use super::events::{Action, poll_event};
use super::layout::{AppLayout, overlay_area, visible_rows};
use super::rendering::{RenderState, render_ui};
use super::worker::Worker;
use crate::browser::{Browser, Command, Outcome, View};
use crate::clipboard::{ClipboardProvider, SystemClipboard, copy_with_provider};

/// Duration for success status messages (milliseconds)
const STATUS_SUCCESS_DURATION_MS: u64 = 3000;
/// Duration for error status messages (milliseconds)
const STATUS_ERROR_DURATION_MS: u64 = 5000;
/// Longest wait for input before re-checking outcomes and timers
const POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Selection jump for PgUp/PgDn before the first frame is drawn
const DEFAULT_PAGE_SIZE: usize = 10;

/// Type of status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
}

/// Transient status message with expiry
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub message_type: MessageType,
    pub expires_at: Instant,
}

pub struct App {
    browser: Browser,
    selected_idx: usize,
    should_quit: bool,
    status_message: Option<StatusMessage>,
    clipboard: Box<dyn ClipboardProvider>,
    /// Commands produced by transitions, waiting for the next flush
    outbox: Vec<Command>,
    /// Last drawn frame size, for mouse hit-testing and paging
    frame_area: Rect,
    needs_redraw: bool,
    last_draw_time: Instant,
}

impl App {
    pub fn new(debounce: Duration) -> Self {
        Self::with_clipboard(debounce, Box::new(SystemClipboard))
    }

    pub fn with_clipboard(debounce: Duration, clipboard: Box<dyn ClipboardProvider>) -> Self {
        let mut browser = Browser::new(debounce);
        let outbox = browser.start();

        Self {
            browser,
            selected_idx: 0,
            should_quit: false,
            status_message: None,
            clipboard,
            outbox,
            frame_area: Rect::default(),
            needs_redraw: true,
            last_draw_time: Instant::now(),
        }
    }

    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    pub fn selected_idx(&self) -> usize {
        self.selected_idx
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn status_message(&self) -> Option<&StatusMessage> {
        self.status_message.as_ref()
    }

    pub fn run<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        worker: &Worker,
        outcomes: &mpsc::Receiver<Outcome>,
    ) -> Result<()> {
        while !self.should_quit {
            self.check_and_clear_expired_status();

            while let Ok(outcome) = outcomes.try_recv() {
                self.apply_outcome(outcome);
            }

            let due = self.browser.tick(Instant::now());
            self.queue(due);
            self.flush(|command| worker.dispatch(command));

            // Draw if dirty or if it's been >100ms (for terminal resize handling)
            let now = Instant::now();
            if self.needs_redraw || now.duration_since(self.last_draw_time) >= POLL_INTERVAL {
                let mut drawn_area = self.frame_area;
                terminal.draw(|f| {
                    drawn_area = f.area();
                    render_ui(f, &self.render_state());
                })?;
                self.frame_area = drawn_area;
                self.needs_redraw = false;
                self.last_draw_time = now;
            }

            let action = poll_event(self.poll_timeout(Instant::now()))?;
            self.handle_action(action);
        }

        Ok(())
    }

    pub fn render_state(&self) -> RenderState<'_> {
        RenderState {
            browser: &self.browser,
            selected_idx: self.selected_idx,
            status_message: self.status_message.as_ref(),
        }
    }

    /// Wait for input no longer than the next debounce deadline
    fn poll_timeout(&self, now: Instant) -> Duration {
        match self.browser.next_deadline() {
            Some(deadline) => deadline.saturating_duration_since(now).min(POLL_INTERVAL),
            None => POLL_INTERVAL,
        }
    }

    /// Set a transient status message with automatic expiry
    fn set_status(&mut self, text: impl Into<String>, message_type: MessageType, duration_ms: u64) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            message_type,
            expires_at: Instant::now() + Duration::from_millis(duration_ms),
        });
        self.needs_redraw = true;
    }

    /// Check and clear expired status messages
    fn check_and_clear_expired_status(&mut self) {
        if self.status_message.as_ref().is_some_and(|msg| Instant::now() >= msg.expires_at) {
            self.status_message = None;
            self.needs_redraw = true;
        }
    }

    fn queue(&mut self, commands: Vec<Command>) {
        if !commands.is_empty() {
            self.outbox.extend(commands);
            self.needs_redraw = true;
        }
    }

    /// Send queued provider commands to `dispatch`; copy to the clipboard here
    fn flush(&mut self, mut dispatch: impl FnMut(Command)) {
        for command in std::mem::take(&mut self.outbox) {
            match command {
                Command::CopyToClipboard { text } => self.copy(&text),
                other => dispatch(other),
            }
        }
    }

    fn copy(&mut self, text: &str) {
        match copy_with_provider(text, self.clipboard.as_mut()) {
            Ok(()) => {
                self.set_status(
                    "✓ Copied to clipboard",
                    MessageType::Success,
                    STATUS_SUCCESS_DURATION_MS,
                );
            }
            Err(e) => {
                self.set_status(
                    format!("✗ Clipboard error: {}", e),
                    MessageType::Error,
                    STATUS_ERROR_DURATION_MS,
                );
            }
        }
    }

    fn apply_outcome(&mut self, outcome: Outcome) {
        if self.browser.apply(outcome) {
            self.needs_redraw = true;
            self.clamp_selection();
        }
        if let Some(notice) = self.browser.take_notice() {
            let (mark, message_type, duration) = if notice.is_error {
                ("✗", MessageType::Error, STATUS_ERROR_DURATION_MS)
            } else {
                ("✓", MessageType::Success, STATUS_SUCCESS_DURATION_MS)
            };
            self.set_status(format!("{} {}", mark, notice.text), message_type, duration);
        }
    }

    /// Handle a user action (extracted for testing)
    fn handle_action(&mut self, action: Action) {
        let overlay_open = self.browser.overlay().is_open();

        match action {
            Action::Quit => self.should_quit = true,
            Action::Back => self.back(),
            Action::ClearQuery if !overlay_open => {
                let commands = self.browser.clear_query();
                self.after_list_change(commands);
            }
            Action::MoveUp if !overlay_open => self.move_selection(-1),
            Action::MoveDown if !overlay_open => self.move_selection(1),
            Action::PageUp if !overlay_open => self.move_selection(-(self.page_size() as isize)),
            Action::PageDown if !overlay_open => self.move_selection(self.page_size() as isize),
            Action::Open if !overlay_open => {
                let view_before = self.browser.view().clone();
                let commands = self.browser.activate(self.selected_idx);
                if *self.browser.view() != view_before {
                    self.selected_idx = 0;
                }
                self.queue(commands);
            }
            Action::CopyToClipboard => {
                let commands = self.browser.copy_prompt();
                if commands.is_empty() {
                    self.set_status(
                        "✗ Open a prompt to copy it",
                        MessageType::Error,
                        STATUS_ERROR_DURATION_MS,
                    );
                }
                self.queue(commands);
            }
            Action::Retry => {
                let commands = self.browser.retry();
                self.queue(commands);
            }
            Action::UpdateSearch(c) if !overlay_open => {
                let commands = self.browser.push_char(c, Instant::now());
                self.after_list_change(commands);
            }
            Action::DeleteChar if !overlay_open => {
                let commands = self.browser.pop_char(Instant::now());
                self.after_list_change(commands);
            }
            Action::Click { column, row } => {
                if overlay_open && !overlay_area(self.frame_area).contains(Position::new(column, row))
                {
                    self.browser.close_overlay();
                    self.needs_redraw = true;
                }
            }
            Action::Resize => self.needs_redraw = true,
            _ => {}
        }
    }

    /// Esc: close the overlay, else clear the query, else go back, else quit
    fn back(&mut self) {
        if self.browser.overlay().is_open() {
            self.browser.close_overlay();
            self.needs_redraw = true;
        } else if !self.browser.query().is_empty() {
            let commands = self.browser.clear_query();
            self.after_list_change(commands);
        } else if matches!(self.browser.view(), View::CategoryDetail(_)) {
            let commands = self.browser.go_back();
            self.after_list_change(commands);
        } else {
            self.should_quit = true;
        }
    }

    fn after_list_change(&mut self, commands: Vec<Command>) {
        self.selected_idx = 0;
        self.needs_redraw = true;
        self.queue(commands);
    }

    fn page_size(&self) -> usize {
        if self.frame_area.is_empty() {
            return DEFAULT_PAGE_SIZE;
        }
        visible_rows(AppLayout::new(self.frame_area).list_area)
    }

    fn move_selection(&mut self, delta: isize) {
        let total = self.browser.screen().len();
        if total == 0 {
            self.selected_idx = 0;
            return;
        }

        let old_idx = self.selected_idx;
        let new_idx = (self.selected_idx as isize + delta).max(0) as usize;
        self.selected_idx = new_idx.min(total - 1);

        if old_idx != self.selected_idx {
            self.needs_redraw = true;
        }
    }

    fn clamp_selection(&mut self) {
        let total = self.browser.screen().len();
        self.selected_idx = self.selected_idx.min(total.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::browser::{Screen, View};
    use crate::models::{Category, PromptDetail, PromptSummary};
    use crate::provider::ProviderError;

    #[derive(Clone, Default)]
    struct RecordingClipboard {
        copies: Arc<Mutex<Vec<String>>>,
    }

    impl ClipboardProvider for RecordingClipboard {
        fn set_text(&mut self, text: &str) -> Result<()> {
            self.copies.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    struct FailingClipboard;

    impl ClipboardProvider for FailingClipboard {
        fn set_text(&mut self, _: &str) -> Result<()> {
            anyhow::bail!("no display")
        }
    }

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            icon: String::new(),
            prompt_count: 1,
            color: String::new(),
        }
    }

    fn summary(id: &str) -> PromptSummary {
        PromptSummary {
            id: id.to_string(),
            category_id: "coding".to_string(),
            title: format!("Title {}", id),
            description: String::new(),
            tags: vec![],
        }
    }

    fn detail(id: &str) -> PromptDetail {
        PromptDetail {
            summary: summary(id),
            full_description: String::new(),
            content: format!("Content {}", id),
        }
    }

    /// Drain the outbox, returning provider-bound commands
    fn take_commands(app: &mut App) -> Vec<Command> {
        let mut sent = Vec::new();
        app.flush(|command| sent.push(command));
        sent
    }

    fn request_of(commands: &[Command]) -> crate::browser::RequestId {
        commands[0].request().unwrap()
    }

    /// App on the home view with categories loaded
    fn loaded_app(clipboard: Box<dyn ClipboardProvider>) -> App {
        let mut app = App::with_clipboard(Duration::ZERO, clipboard);
        let request = request_of(&take_commands(&mut app));
        app.apply_outcome(Outcome::CategoriesLoaded {
            request,
            result: Ok(vec![
                category("coding", "Coding"),
                category("marketing", "Marketing"),
                category("writing", "Writing"),
            ]),
        });
        app
    }

    /// App with the coding category open and two prompts listed
    fn app_in_category(clipboard: Box<dyn ClipboardProvider>) -> App {
        let mut app = loaded_app(clipboard);
        app.handle_action(Action::Open);
        let request = request_of(&take_commands(&mut app));
        app.apply_outcome(Outcome::CategoryPromptsLoaded {
            request,
            category_id: "coding".into(),
            result: Ok(vec![summary("p1"), summary("p2")]),
        });
        app
    }

    #[test]
    fn test_app_new_requests_categories() {
        let mut app = App::with_clipboard(Duration::ZERO, Box::new(RecordingClipboard::default()));

        assert_eq!(app.selected_idx(), 0);
        assert!(!app.should_quit());
        assert!(matches!(take_commands(&mut app)[..], [Command::LoadCategories { .. }]));
        assert_eq!(app.browser().screen(), Screen::Loading);
    }

    #[test]
    fn test_move_selection_bounds() {
        let mut app = loaded_app(Box::new(RecordingClipboard::default()));

        app.handle_action(Action::MoveUp);
        assert_eq!(app.selected_idx(), 0);

        app.handle_action(Action::MoveDown);
        app.handle_action(Action::MoveDown);
        app.handle_action(Action::MoveDown);
        assert_eq!(app.selected_idx(), 2);

        app.handle_action(Action::PageUp);
        assert_eq!(app.selected_idx(), 0);
        app.handle_action(Action::PageDown);
        assert_eq!(app.selected_idx(), 2);
    }

    #[test]
    fn test_open_category_resets_selection() {
        let mut app = loaded_app(Box::new(RecordingClipboard::default()));
        app.handle_action(Action::MoveDown);

        app.handle_action(Action::Open);

        assert_eq!(app.browser().view(), &View::CategoryDetail("marketing".into()));
        assert_eq!(app.selected_idx(), 0);
        assert!(matches!(take_commands(&mut app)[..], [Command::LoadCategoryPrompts { .. }]));
    }

    #[test]
    fn test_typing_resets_selection_and_filters() {
        let mut app = loaded_app(Box::new(RecordingClipboard::default()));
        app.handle_action(Action::MoveDown);

        app.handle_action(Action::UpdateSearch('w'));

        assert_eq!(app.selected_idx(), 0);
        assert_eq!(app.browser().query(), "w");
        assert_eq!(app.browser().screen().len(), 1);
    }

    #[test]
    fn test_content_search_dispatched_through_outbox() {
        let mut app = loaded_app(Box::new(RecordingClipboard::default()));

        app.handle_action(Action::UpdateSearch('c'));
        app.handle_action(Action::UpdateSearch('o'));

        let commands = take_commands(&mut app);
        assert!(matches!(&commands[..], [Command::Search { query, .. }] if query == "co"));
    }

    #[test]
    fn test_escape_order() {
        let mut app = app_in_category(Box::new(RecordingClipboard::default()));
        app.handle_action(Action::Open);
        assert!(app.browser().overlay().is_open());

        app.handle_action(Action::Back);
        assert!(!app.browser().overlay().is_open());
        assert!(matches!(app.browser().view(), View::CategoryDetail(_)));

        app.handle_action(Action::Back);
        assert_eq!(app.browser().view(), &View::Home);

        app.handle_action(Action::UpdateSearch('x'));
        app.handle_action(Action::Back);
        assert_eq!(app.browser().query(), "");
        assert!(!app.should_quit());

        app.handle_action(Action::Back);
        assert!(app.should_quit());
    }

    #[test]
    fn test_overlay_blocks_list_input() {
        let mut app = app_in_category(Box::new(RecordingClipboard::default()));
        app.handle_action(Action::Open);

        app.handle_action(Action::UpdateSearch('z'));
        app.handle_action(Action::MoveDown);

        assert_eq!(app.browser().query(), "");
        assert_eq!(app.selected_idx(), 0);
    }

    #[test]
    fn test_copy_after_hydration() {
        let clipboard = RecordingClipboard::default();
        let copies = Arc::clone(&clipboard.copies);
        let mut app = app_in_category(Box::new(clipboard));
        app.handle_action(Action::Open);
        let request = request_of(&take_commands(&mut app));
        app.apply_outcome(Outcome::PromptDetailLoaded {
            request,
            prompt_id: "p1".into(),
            result: Ok(detail("p1")),
        });

        app.handle_action(Action::CopyToClipboard);
        assert!(take_commands(&mut app).is_empty());

        assert_eq!(copies.lock().unwrap().as_slice(), ["Content p1".to_string()]);
        assert_eq!(app.status_message().unwrap().message_type, MessageType::Success);
    }

    #[test]
    fn test_copy_before_hydration_reports_error() {
        let clipboard = RecordingClipboard::default();
        let copies = Arc::clone(&clipboard.copies);
        let mut app = app_in_category(Box::new(clipboard));
        app.handle_action(Action::Open);

        app.handle_action(Action::CopyToClipboard);
        take_commands(&mut app);

        assert!(copies.lock().unwrap().is_empty());
        assert_eq!(app.status_message().unwrap().message_type, MessageType::Error);
    }

    #[test]
    fn test_clipboard_failure_shows_error() {
        let mut app = app_in_category(Box::new(FailingClipboard));
        app.handle_action(Action::Open);
        let request = request_of(&take_commands(&mut app));
        app.apply_outcome(Outcome::PromptDetailLoaded {
            request,
            prompt_id: "p1".into(),
            result: Ok(detail("p1")),
        });

        app.handle_action(Action::CopyToClipboard);
        take_commands(&mut app);

        let status = app.status_message().unwrap();
        assert_eq!(status.message_type, MessageType::Error);
        assert!(status.text.contains("no display"));
    }

    #[test]
    fn test_detail_failure_shows_status() {
        let mut app = app_in_category(Box::new(RecordingClipboard::default()));
        app.handle_action(Action::Open);
        let request = request_of(&take_commands(&mut app));

        app.apply_outcome(Outcome::PromptDetailLoaded {
            request,
            prompt_id: "p1".into(),
            result: Err(ProviderError::Transport("connection reset".into())),
        });

        assert!(!app.browser().overlay().is_open());
        assert_eq!(app.status_message().unwrap().message_type, MessageType::Error);
    }

    #[test]
    fn test_click_outside_overlay_closes_it() {
        let mut app = app_in_category(Box::new(RecordingClipboard::default()));
        app.frame_area = Rect::new(0, 0, 100, 50);
        app.handle_action(Action::Open);

        app.handle_action(Action::Click { column: 50, row: 25 });
        assert!(app.browser().overlay().is_open());

        app.handle_action(Action::Click { column: 1, row: 1 });
        assert!(!app.browser().overlay().is_open());
    }

    #[test]
    fn test_retry_without_failure_is_noop() {
        let mut app = loaded_app(Box::new(RecordingClipboard::default()));

        app.handle_action(Action::Retry);

        assert!(take_commands(&mut app).is_empty());
    }

    #[test]
    fn test_retry_after_failure_reissues_request() {
        let mut app = App::with_clipboard(Duration::ZERO, Box::new(RecordingClipboard::default()));
        let first = request_of(&take_commands(&mut app));
        app.apply_outcome(Outcome::CategoriesLoaded {
            request: first,
            result: Err(ProviderError::Io { path: "categories.json".into(), reason: "denied".into() }),
        });

        app.handle_action(Action::Retry);

        let commands = take_commands(&mut app);
        assert!(matches!(commands[..], [Command::LoadCategories { request }] if request > first));
    }

    #[test]
    fn test_poll_timeout_respects_deadline() {
        let mut app = App::with_clipboard(
            Duration::from_millis(30),
            Box::new(RecordingClipboard::default()),
        );
        let now = Instant::now();
        assert_eq!(app.poll_timeout(now), POLL_INTERVAL);

        app.browser.set_query("code", now);
        assert_eq!(app.poll_timeout(now), Duration::from_millis(30));
    }

    #[test]
    fn test_status_message_expiry() {
        let mut app = App::with_clipboard(Duration::ZERO, Box::new(RecordingClipboard::default()));

        app.set_status("Expired", MessageType::Success, 0);
        app.check_and_clear_expired_status();
        assert!(app.status_message().is_none());

        app.set_status("Active", MessageType::Error, 10_000);
        app.check_and_clear_expired_status();
        assert_eq!(app.status_message().unwrap().text, "Active");
    }
}
