//! Interactive terminal browser.
//!
//! Provider calls run on a multi-threaded tokio runtime owned by this module;
//! the UI loop itself is synchronous and single-threaded.

mod app;
mod events;
mod layout;
mod rendering;
mod terminal;
mod worker;

use anyhow::{Context, Result};
pub use app::{App, MessageType, StatusMessage};
pub use rendering::{RenderState, render_ui};
use terminal::TerminalManager;
use tracing::info;
pub use worker::Worker;

use crate::config::Settings;

/// Run the interactive browser until the user quits
pub fn run_interactive(settings: &Settings) -> Result<()> {
    let provider = settings.open_provider()?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    info!(source = %settings.source, "Starting catalog browser");
    let (worker, outcomes) = Worker::new(runtime.handle().clone(), provider);
    let mut app = App::new(settings.debounce);

    let mut manager = TerminalManager::new()?;
    let res = app.run(manager.terminal_mut(), &worker, &outcomes);
    manager.restore()?;

    // Outstanding requests are abandoned, not awaited
    runtime.shutdown_background();
    res
}
