use tracing::{debug, warn};

use super::command::{Command, RequestId};
use crate::models::{PromptDetail, PromptSummary};
use crate::provider::{ProviderError, ProviderResult};

/// Detail overlay for a single selected prompt
///
/// Opens optimistically with the summary already in hand, then hydrates with
/// the full detail. Every selection gets its own request id, so a hydration
/// response only lands if the overlay is still showing the selection that
/// asked for it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    Closed,
    Opening {
        summary: PromptSummary,
        request: RequestId,
    },
    Loaded(PromptDetail),
}

/// Result of feeding a hydration response to the overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hydration {
    Applied,
    /// Response no longer matches the selection; nothing changed
    Discarded,
    /// Hydration failed for the current selection; the overlay closed itself
    Closed(ProviderError),
}

impl Overlay {
    pub fn is_open(&self) -> bool {
        !matches!(self, Overlay::Closed)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Overlay::Opening { .. })
    }

    /// Summary fields currently displayed, loaded or not
    pub fn summary(&self) -> Option<&PromptSummary> {
        match self {
            Overlay::Closed => None,
            Overlay::Opening { summary, .. } => Some(summary),
            Overlay::Loaded(detail) => Some(&detail.summary),
        }
    }

    pub fn detail(&self) -> Option<&PromptDetail> {
        match self {
            Overlay::Loaded(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn open(&mut self, summary: PromptSummary, request: RequestId) -> Command {
        let prompt_id = summary.id.clone();
        *self = Overlay::Opening { summary, request };
        Command::LoadPromptDetail { request, prompt_id }
    }

    /// Safe in any state; a pending hydration becomes a no-op
    pub fn close(&mut self) {
        *self = Overlay::Closed;
    }

    pub fn apply(
        &mut self,
        request: RequestId,
        prompt_id: &str,
        result: ProviderResult<PromptDetail>,
    ) -> Hydration {
        let selected_id = match self {
            Overlay::Opening { summary, request: pending }
                if *pending == request && summary.id == prompt_id =>
            {
                summary.id.clone()
            }
            _ => {
                debug!(request = request.value(), prompt_id, "Discarding stale prompt detail");
                return Hydration::Discarded;
            }
        };

        match result {
            Ok(detail) if detail.id() == selected_id => {
                *self = Overlay::Loaded(detail);
                Hydration::Applied
            }
            Ok(detail) => {
                warn!(expected = %selected_id, received = detail.id(), "Prompt detail id mismatch");
                self.close();
                Hydration::Closed(ProviderError::prompt_not_found(selected_id))
            }
            Err(err) => {
                warn!(prompt_id, error = %err, "Prompt detail failed; closing overlay");
                self.close();
                Hydration::Closed(err)
            }
        }
    }

    /// Copy the template body once it has loaded
    pub fn copy_command(&self) -> Option<Command> {
        self.detail().map(|detail| Command::CopyToClipboard { text: detail.content.clone() })
    }
}
