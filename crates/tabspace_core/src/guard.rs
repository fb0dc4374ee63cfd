//! Navigation guard.
//!
//! Before a transition hides the active tab, the guard asks the page's
//! unsaved-work handle whether leaving is safe. If it is not, the user gets a
//! confirmation prompt; the callback-style modal answer is adapted into a
//! future so callers can simply await the decision.
//!
//! Only one prompt can be open at a time. A guarded navigation that needs a
//! prompt while another prompt is pending is declined immediately.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::models::Tab;
use crate::services::{ConfirmRequest, ConfirmResponder, ModalService, Notice, UnsavedWorkRegistry};

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// The transition may proceed.
    Proceed,
    /// The user stayed on the tab, or saving failed.
    Decline,
}

/// Marks the prompt slot busy and frees it on drop, whichever way the check ends.
struct PromptSlot<'a>(&'a AtomicBool);

impl<'a> PromptSlot<'a> {
    fn claim(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for PromptSlot<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Gate in front of every transition that would hide the active tab.
pub struct NavigationGuard {
    registry: Arc<UnsavedWorkRegistry>,
    modal: Arc<dyn ModalService>,
    prompt_open: AtomicBool,
}

impl NavigationGuard {
    pub fn new(registry: Arc<UnsavedWorkRegistry>, modal: Arc<dyn ModalService>) -> Self {
        Self { registry, modal, prompt_open: AtomicBool::new(false) }
    }

    /// Whether a confirmation prompt is currently waiting for the user.
    pub fn is_prompting(&self) -> bool {
        self.prompt_open.load(Ordering::Acquire)
    }

    /// Decide whether the user may leave `leaving`.
    pub async fn check(&self, leaving: &Tab) -> GuardDecision {
        let Some(handle) = self.registry.get(leaving.key()) else {
            return GuardDecision::Proceed;
        };
        if !handle.has_unsaved_changes() {
            return GuardDecision::Proceed;
        }

        let Some(_slot) = PromptSlot::claim(&self.prompt_open) else {
            tracing::debug!(key = %leaving.key(), "Confirmation already pending, declining navigation");
            return GuardDecision::Decline;
        };

        let can_save = handle.can_save();
        let request = if can_save {
            ConfirmRequest::save_and_leave(leaving.label())
        } else {
            ConfirmRequest::discard_and_leave(leaving.label())
        };

        tracing::info!(key = %leaving.key(), can_save, "Asking to leave tab with unsaved changes");
        let (responder, answer) = ConfirmResponder::channel();
        self.modal.confirm(request, responder);

        // A dropped responder means the dialog went away without an answer
        let confirmed = answer.await.unwrap_or(false);
        if !confirmed {
            tracing::debug!(key = %leaving.key(), "User stayed on tab");
            return GuardDecision::Decline;
        }

        if can_save {
            if let Err(e) = handle.save_and_continue().await {
                tracing::warn!(key = %leaving.key(), error = %e, "Save before leaving failed");
                self.modal.inform(Notice::from_error(&e));
                return GuardDecision::Decline;
            }
        }

        GuardDecision::Proceed
    }
}
