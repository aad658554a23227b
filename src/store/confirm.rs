use serde::{Deserialize, Serialize};

/// A deferred cascade waiting for the user's answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingAction {
    /// Every task is done; also mark the section complete
    CompleteSection { section_id: String },
    /// The section was completed; also complete its remaining tasks
    CompleteAllTasks { section_id: String },
}

impl PendingAction {
    pub fn section_id(&self) -> &str {
        match self {
            PendingAction::CompleteSection { section_id }
            | PendingAction::CompleteAllTasks { section_id } => section_id,
        }
    }
}

/// Optional button labels
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmOptions {
    pub confirm_text: Option<String>,
    pub cancel_text: Option<String>,
}

/// What the confirmation dialog shows, plus the action `confirm` runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_text: Option<String>,
    pub action: PendingAction,
}

/// Single-slot confirmation state: hidden, or showing one prompt.
///
/// Showing a new prompt replaces whatever was pending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmationSlot {
    pending: Option<Confirmation>,
}

impl ConfirmationSlot {
    pub fn show(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        action: PendingAction,
        options: ConfirmOptions,
    ) {
        if let Some(replaced) = &self.pending {
            tracing::debug!(title = %replaced.title, "replacing pending confirmation");
        }
        self.pending = Some(Confirmation {
            title: title.into(),
            message: message.into(),
            confirm_text: options.confirm_text,
            cancel_text: options.cancel_text,
            action,
        });
    }

    pub fn is_visible(&self) -> bool {
        self.pending.is_some()
    }

    pub fn current(&self) -> Option<&Confirmation> {
        self.pending.as_ref()
    }

    /// Hide the prompt and hand back its action for the caller to run
    pub fn confirm(&mut self) -> Option<PendingAction> {
        self.pending.take().map(|c| c.action)
    }

    /// Hide the prompt without running anything
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
