//! Test doubles for the modal service and hosted pages, plus workspace fixtures.

use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::WorkspaceConfig;
use crate::error::WorkspaceError;
use crate::models::TabKey;
use crate::services::{
    ConfirmRequest, ConfirmResponder, ModalService, Notice, RouteTable, TabStore, UnsavedWork,
};
use crate::workspace::Workspace;

pub fn key(path: &str) -> TabKey {
    TabKey::parse(path).unwrap()
}

/// Route table with `/home` (component `dashboard`) plus one page per path,
/// titled `Page <name>` and using the path as its component id.
pub fn route_table(paths: &[&str]) -> Arc<RouteTable> {
    let mut table = RouteTable::new();
    table.add("/home", "Home", "dashboard").unwrap();
    for path in paths {
        let title = format!("Page {}", path.trim_start_matches('/'));
        table.add(path, &title, path).unwrap();
    }
    Arc::new(table)
}

/// Workspace over `route_table(paths)` with a modal that always confirms.
pub fn workspace(paths: &[&str], max_tabs: usize, store: Arc<dyn TabStore>) -> Workspace {
    Workspace::builder(WorkspaceConfig::default().with_max_tabs(max_tabs))
        .route_table(route_table(paths))
        .modal(Arc::new(RecordingModal::answering(true)))
        .store(store)
        .build()
        .unwrap()
}

/// Modal that records every dialog and either answers immediately or parks
/// the responder for the test to answer later.
#[derive(Default)]
pub struct RecordingModal {
    answer: Mutex<Option<bool>>,
    prompts: Mutex<Vec<ConfirmRequest>>,
    pending: Mutex<Vec<ConfirmResponder>>,
    notices: Mutex<Vec<Notice>>,
}

impl RecordingModal {
    /// Parks every confirmation until the test answers it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers every confirmation immediately.
    pub fn answering(confirmed: bool) -> Self {
        let modal = Self::default();
        modal.set_answer(Some(confirmed));
        modal
    }

    pub fn set_answer(&self, answer: Option<bool>) {
        *self.answer.lock() = answer;
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().len()
    }

    pub fn last_prompt(&self) -> Option<ConfirmRequest> {
        self.prompts.lock().last().cloned()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    /// Answer the oldest parked confirmation. Returns false if none was waiting.
    pub fn answer_pending(&self, confirmed: bool) -> bool {
        let responder = {
            let mut pending = self.pending.lock();
            if pending.is_empty() {
                return false;
            }
            pending.remove(0)
        };
        responder.respond(confirmed);
        true
    }

    /// Close every parked dialog without answering.
    pub fn dismiss_pending(&self) {
        self.pending.lock().clear();
    }
}

impl ModalService for RecordingModal {
    fn confirm(&self, request: ConfirmRequest, responder: ConfirmResponder) {
        self.prompts.lock().push(request);
        let answer = *self.answer.lock();
        match answer {
            Some(confirmed) => responder.respond(confirmed),
            None => self.pending.lock().push(responder),
        }
    }

    fn inform(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

/// Hosted page with a toggleable dirty flag and an optional save action.
pub struct DirtyPage {
    dirty: AtomicBool,
    save_result: Option<Result<(), String>>,
    saves: AtomicUsize,
}

impl DirtyPage {
    /// Page without a save action.
    pub fn new(dirty: bool) -> Arc<Self> {
        Arc::new(Self { dirty: AtomicBool::new(dirty), save_result: None, saves: AtomicUsize::new(0) })
    }

    /// Dirty page whose save action returns `result`.
    pub fn saving(result: Result<(), String>) -> Arc<Self> {
        Arc::new(Self {
            dirty: AtomicBool::new(true),
            save_result: Some(result),
            saves: AtomicUsize::new(0),
        })
    }

    pub fn set_dirty(&self, dirty: bool) {
        self.dirty.store(dirty, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl UnsavedWork for DirtyPage {
    fn has_unsaved_changes(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    fn can_save(&self) -> bool {
        self.save_result.is_some()
    }

    fn save_and_continue(&self) -> BoxFuture<'_, Result<(), WorkspaceError>> {
        Box::pin(async move {
            self.saves.fetch_add(1, Ordering::SeqCst);
            match &self.save_result {
                Some(Err(message)) => Err(WorkspaceError::save_failed("page", message.clone())),
                _ => {
                    self.set_dirty(false);
                    Ok(())
                }
            }
        })
    }
}
