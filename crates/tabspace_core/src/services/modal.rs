//! Confirmation and informational modal boundary.
//!
//! The presentation layer owns the dialogs. The workspace hands it a
//! [`ConfirmRequest`] plus a single-shot [`ConfirmResponder`]; answering the
//! responder resolves the future the navigation guard is awaiting.

use tokio::sync::oneshot;

use crate::error::WorkspaceError;

/// Which confirmation the user is being asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmKind {
    /// The page can save; confirming saves before leaving.
    SaveAndLeave,
    /// The page cannot save; confirming discards the unsaved work.
    DiscardAndLeave,
}

/// Content of a confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    /// Dialog title.
    pub title: String,
    /// Dialog message.
    pub content: String,
    /// Label for the confirm button.
    pub confirm_label: String,
    /// Label for the cancel button.
    pub cancel_label: String,
    /// Kind of confirmation.
    pub kind: ConfirmKind,
}

impl ConfirmRequest {
    /// Prompt for leaving a tab whose page can save.
    pub fn save_and_leave(label: &str) -> Self {
        Self {
            title: "Unsaved changes".to_string(),
            content: format!("\"{label}\" has unsaved changes. Save them before leaving?"),
            confirm_label: "Save and leave".to_string(),
            cancel_label: "Stay".to_string(),
            kind: ConfirmKind::SaveAndLeave,
        }
    }

    /// Prompt for leaving a tab whose page cannot save.
    pub fn discard_and_leave(label: &str) -> Self {
        Self {
            title: "Unsaved changes".to_string(),
            content: format!("\"{label}\" has unsaved changes that will be lost. Leave anyway?"),
            confirm_label: "Leave".to_string(),
            cancel_label: "Stay".to_string(),
            kind: ConfirmKind::DiscardAndLeave,
        }
    }
}

/// Content of an informational dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub content: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self { title: title.into(), content: content.into() }
    }

    /// Build a notice from an error's user-displayable info.
    pub fn from_error(error: &WorkspaceError) -> Self {
        let info = error.to_error_info();
        let content = match info.hint {
            Some(hint) => format!("{}. {hint}.", info.message),
            None => info.message,
        };
        Self { title: info.error_type, content }
    }
}

/// Single-shot answer to a confirmation prompt.
///
/// Dropping the responder without answering counts as a cancel.
#[derive(Debug)]
pub struct ConfirmResponder {
    tx: oneshot::Sender<bool>,
}

impl ConfirmResponder {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<bool>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// The user confirmed.
    pub fn confirm(self) {
        self.respond(true);
    }

    /// The user cancelled.
    pub fn cancel(self) {
        self.respond(false);
    }

    /// Answer with an explicit decision.
    pub fn respond(self, confirmed: bool) {
        // The guard may have been dropped by its caller; nothing to deliver then
        let _ = self.tx.send(confirmed);
    }
}

/// Presentation layer for blocking dialogs.
pub trait ModalService: Send + Sync {
    /// Show a confirmation dialog and answer through `responder` when the user decides.
    fn confirm(&self, request: ConfirmRequest, responder: ConfirmResponder);

    /// Show an informational dialog.
    fn inform(&self, notice: Notice);
}
