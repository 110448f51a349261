//! Runs provider commands in the background and reports outcomes over a channel.
//!
//! The UI loop stays synchronous: it hands commands to [`Worker::dispatch`],
//! then drains the receiver once per frame and feeds each outcome to the
//! browser. Outcomes arrive in completion order; the browser decides which
//! ones still matter.
//!
//! A send only fails once the receiver is gone (the browser is shutting
//! down), so send errors are ignored.

use std::sync::Arc;
use std::sync::mpsc;

use tokio::runtime::Handle;
use tracing::error;

use crate::browser::{Command, Outcome, execute};
use crate::provider::{DataProvider, ProviderError};

pub struct Worker {
    handle: Handle,
    provider: Arc<dyn DataProvider>,
    tx: mpsc::Sender<Outcome>,
}

impl Worker {
    /// Create a worker and the receiver its outcomes arrive on
    pub fn new(handle: Handle, provider: Arc<dyn DataProvider>) -> (Self, mpsc::Receiver<Outcome>) {
        let (tx, rx) = mpsc::channel();
        (Self { handle, provider, tx }, rx)
    }

    /// Run a provider-bound command on the runtime
    pub fn dispatch(&self, command: Command) {
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();

        self.handle.spawn(async move {
            let task = tokio::spawn({
                let command = command.clone();
                async move { execute(provider.as_ref(), command).await }
            });

            // A panicking provider must still resolve the request, or the
            // browser would show its loading state forever
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(err) => {
                    error!(?command, error = %err, "Background request crashed");
                    command.into_failure(ProviderError::Transport(format!(
                        "Background request failed: {}",
                        err
                    )))
                }
            };

            if let Some(outcome) = outcome {
                let _ = tx.send(outcome);
            }
        });
    }
}
