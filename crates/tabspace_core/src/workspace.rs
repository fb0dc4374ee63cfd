//! The tab workspace.
//!
//! [`Workspace`] is the single owner of [`TabState`]. Every operation that
//! could hide the active tab runs in three steps: apply the transition to a
//! clone to see whether the active key would change, ask the
//! [`NavigationGuard`] if it would, then re-apply the transition to the live
//! state and commit. Committed changes are mirrored into the session store and
//! broadcast as [`WorkspaceEvent`]s.
//!
//! Expected failures (unknown route, tab limit) are reported through the
//! informational modal and returned as [`Navigation::Rejected`]; state is left
//! untouched.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::config::WorkspaceConfig;
use crate::context_menu::{build_tab_menu, TabMenuAction, TabMenuEntry};
use crate::error::WorkspaceError;
use crate::guard::{GuardDecision, NavigationGuard};
use crate::models::{Route, Tab, TabKey, WorkspaceEvent};
use crate::reorder::{self, ReorderController, TabMove};
use crate::services::{
    BreadcrumbResolver, MemoryStore, ModalService, NoBreadcrumbs, Notice, RouteResolver,
    SessionStore, TabStore, UnsavedWork, UnsavedWorkRegistry,
};
use crate::state::TabState;

// ============================================================================
// Navigation
// ============================================================================

/// Outcome of an operation that may be guarded.
#[derive(Debug)]
pub enum Navigation<T> {
    /// The transition was committed.
    Completed(T),
    /// The user chose to stay on the active tab. Nothing changed.
    Declined,
    /// The operation is not possible; the user has been informed. Nothing changed.
    Rejected(WorkspaceError),
}

impl<T> Navigation<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn is_declined(&self) -> bool {
        matches!(self, Self::Declined)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// The committed result, if any.
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            _ => None,
        }
    }

    /// The rejection reason, if any.
    pub fn rejection(&self) -> Option<&WorkspaceError> {
        match self {
            Self::Rejected(error) => Some(error),
            _ => None,
        }
    }
}

// ============================================================================
// WorkspaceBuilder
// ============================================================================

/// Builder for [`Workspace`].
pub struct WorkspaceBuilder {
    config: WorkspaceConfig,
    routes: Option<Arc<dyn RouteResolver>>,
    breadcrumbs: Option<Arc<dyn BreadcrumbResolver>>,
    modal: Option<Arc<dyn ModalService>>,
    store: Option<Arc<dyn TabStore>>,
    registry: Option<Arc<UnsavedWorkRegistry>>,
}

impl WorkspaceBuilder {
    fn new(config: WorkspaceConfig) -> Self {
        Self { config, routes: None, breadcrumbs: None, modal: None, store: None, registry: None }
    }

    /// Set the route resolver (required).
    pub fn routes(mut self, routes: Arc<dyn RouteResolver>) -> Self {
        self.routes = Some(routes);
        self
    }

    /// Set the breadcrumb resolver used for tab labels.
    pub fn breadcrumbs(mut self, breadcrumbs: Arc<dyn BreadcrumbResolver>) -> Self {
        self.breadcrumbs = Some(breadcrumbs);
        self
    }

    /// Use one table as both route and breadcrumb resolver.
    pub fn route_table<T>(self, table: Arc<T>) -> Self
    where
        T: RouteResolver + BreadcrumbResolver + 'static,
    {
        self.routes(table.clone()).breadcrumbs(table)
    }

    /// Set the modal service (required).
    pub fn modal(mut self, modal: Arc<dyn ModalService>) -> Self {
        self.modal = Some(modal);
        self
    }

    /// Set the persisted tab store. Defaults to an in-memory store.
    pub fn store(mut self, store: Arc<dyn TabStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Share an existing unsaved-work registry.
    pub fn registry(mut self, registry: Arc<UnsavedWorkRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Validate the configuration, resolve the home tab, and restore the stored session.
    pub fn build(self) -> Result<Workspace, WorkspaceError> {
        let home_key = self.config.validate()?;
        let routes =
            self.routes.ok_or_else(|| WorkspaceError::config("a route resolver is required"))?;
        let modal = self.modal.ok_or_else(|| WorkspaceError::config("a modal service is required"))?;
        let breadcrumbs = self.breadcrumbs.unwrap_or_else(|| Arc::new(NoBreadcrumbs));
        let store = self.store.unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let registry = self.registry.unwrap_or_default();

        let home_route = routes.resolve(&home_key).ok_or_else(|| {
            WorkspaceError::config(format!("home route '{home_key}' is not registered"))
        })?;
        let home = Tab::new(home_key.clone(), label_for(breadcrumbs.as_ref(), &home_key, &home_route));

        let session = SessionStore::new(store, &self.config);
        let restored = session.restore();

        let mut resolved: Vec<(Tab, Route)> = Vec::new();
        for tab in restored.tabs {
            if *tab.key() == home_key {
                continue;
            }
            match routes.resolve(tab.key()) {
                Some(route) => resolved.push((tab, route)),
                None => tracing::warn!(key = %tab.key(), "Dropping restored tab without a route"),
            }
        }

        let state = TabState::restore(
            home,
            self.config.max_tabs,
            resolved.iter().map(|(tab, _)| tab.clone()),
            restored.active.as_ref(),
        );

        let mut documents = HashMap::from([(home_key, home_route)]);
        for (tab, route) in resolved {
            if state.contains(tab.key()) {
                documents.entry(tab.key().clone()).or_insert(route);
            }
        }

        session.persist(&state);
        tracing::info!(
            tabs = state.len(),
            active = %state.active_key(),
            max_tabs = state.max_tabs(),
            "Workspace ready"
        );

        let (events, _) = broadcast::channel(self.config.event_capacity);
        let guard = NavigationGuard::new(registry.clone(), modal.clone());

        Ok(Workspace {
            config: self.config,
            state: Mutex::new(state),
            drag: Mutex::new(ReorderController::new()),
            documents: RwLock::new(documents),
            routes,
            breadcrumbs,
            modal,
            registry,
            guard,
            session,
            events,
        })
    }
}

/// Label frozen into a new tab: last breadcrumb, then route name, then the key.
fn label_for(breadcrumbs: &dyn BreadcrumbResolver, key: &TabKey, route: &Route) -> String {
    breadcrumbs
        .breadcrumbs(key)
        .pop()
        .map(|crumb| crumb.title)
        .filter(|title| !title.is_empty())
        .or_else(|| Some(route.name.clone()).filter(|name| !name.is_empty()))
        .unwrap_or_else(|| key.to_string())
}

// ============================================================================
// Workspace
// ============================================================================

/// Tabbed document workspace.
pub struct Workspace {
    config: WorkspaceConfig,
    state: Mutex<TabState>,
    drag: Mutex<ReorderController>,
    documents: RwLock<HashMap<TabKey, Route>>,
    routes: Arc<dyn RouteResolver>,
    breadcrumbs: Arc<dyn BreadcrumbResolver>,
    modal: Arc<dyn ModalService>,
    registry: Arc<UnsavedWorkRegistry>,
    guard: NavigationGuard,
    session: SessionStore,
    events: broadcast::Sender<WorkspaceEvent>,
}

impl Workspace {
    /// Start building a workspace.
    pub fn builder(config: WorkspaceConfig) -> WorkspaceBuilder {
        WorkspaceBuilder::new(config)
    }

    // ========== Queries ==========

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> TabState {
        self.state.lock().clone()
    }

    /// Open tabs in display order.
    pub fn tabs(&self) -> Vec<Tab> {
        self.state.lock().tabs().to_vec()
    }

    pub fn active_key(&self) -> TabKey {
        self.state.lock().active_key().clone()
    }

    pub fn is_pinned(&self, key: &TabKey) -> bool {
        self.state.lock().is_pinned(key)
    }

    /// Context menu entries for a tab.
    pub fn context_menu(&self, key: &TabKey) -> Vec<TabMenuEntry> {
        build_tab_menu(&self.state.lock(), key)
    }

    /// Route cached for an open tab when it was opened.
    pub fn document(&self, key: &TabKey) -> Option<Route> {
        self.documents.read().get(key).cloned()
    }

    /// Subscribe to committed changes.
    pub fn subscribe(&self) -> broadcast::Receiver<WorkspaceEvent> {
        self.events.subscribe()
    }

    /// Whether a leave confirmation is waiting for the user.
    pub fn is_prompting(&self) -> bool {
        self.guard.is_prompting()
    }

    // ========== Unsaved-work handles ==========

    pub fn registry(&self) -> &Arc<UnsavedWorkRegistry> {
        &self.registry
    }

    /// Called by a hosted page when it mounts.
    pub fn register_tab_handle(&self, key: TabKey, handle: Arc<dyn UnsavedWork>) {
        self.registry.register(key, handle);
    }

    /// Called by a hosted page when it unmounts.
    pub fn unregister_tab_handle(&self, key: &TabKey) {
        self.registry.unregister(key);
    }

    // ========== Guarded operations ==========

    /// Open a page, or switch to it if it is already open.
    pub async fn open(&self, key: &TabKey) -> Navigation<TabKey> {
        let already_open = self.state.lock().contains(key);
        if already_open {
            return self.activate(key).await;
        }

        let Some(route) = self.routes.resolve(key) else {
            return self.reject("open", WorkspaceError::route_not_found(key.as_str()));
        };
        let tab = Tab::new(key.clone(), label_for(self.breadcrumbs.as_ref(), key, &route));

        let outcome =
            self.navigate("open", |state| state.open(tab.clone()).map(|_| key.clone())).await;
        if outcome.is_completed() {
            self.documents.write().entry(key.clone()).or_insert(route);
        }
        outcome
    }

    /// Switch to an open tab.
    pub async fn activate(&self, key: &TabKey) -> Navigation<TabKey> {
        if self.routes.resolve(key).is_none() {
            return self.reject("activate", WorkspaceError::route_not_found(key.as_str()));
        }
        self.navigate("activate", |state| state.activate(key).map(|_| key.clone())).await
    }

    /// Close a tab. Completes with the active key afterwards.
    pub async fn close(&self, key: &TabKey) -> Navigation<TabKey> {
        self.navigate("close", |state| Ok(state.close(key))).await
    }

    /// Close every unpinned tab except `key`.
    pub async fn close_others(&self, key: &TabKey) -> Navigation<TabKey> {
        self.navigate("close_others", |state| Ok(state.close_others(key))).await
    }

    /// Close every unpinned tab to the right of `key`.
    pub async fn close_right(&self, key: &TabKey) -> Navigation<TabKey> {
        self.navigate("close_right", |state| Ok(state.close_right(key))).await
    }

    /// Close every unpinned tab.
    pub async fn close_all(&self) -> Navigation<TabKey> {
        self.navigate("close_all", |state| Ok(state.close_all())).await
    }

    /// Ask the host to remount every open tab. Completes with the reloaded keys.
    pub async fn reload_all(&self) -> Navigation<Vec<TabKey>> {
        let leaving = self.state.lock().active_tab().cloned();
        if let Some(tab) = leaving {
            if self.guard.check(&tab).await == GuardDecision::Decline {
                tracing::debug!(key = %tab.key(), "Reload declined");
                return Navigation::Declined;
            }
        }

        let keys: Vec<TabKey> =
            self.state.lock().tabs().iter().map(|tab| tab.key().clone()).collect();
        tracing::debug!(tabs = keys.len(), "Reloading all tabs");
        self.emit(WorkspaceEvent::Reloaded { keys: keys.clone() });
        Navigation::Completed(keys)
    }

    /// Run a context menu action. Completes with the active key afterwards.
    pub async fn run_menu_action(&self, key: &TabKey, action: TabMenuAction) -> Navigation<TabKey> {
        match action {
            TabMenuAction::TogglePin => {
                self.toggle_pin(key);
                Navigation::Completed(self.active_key())
            }
            TabMenuAction::Close => self.close(key).await,
            TabMenuAction::CloseOthers => self.close_others(key).await,
            TabMenuAction::CloseRight => self.close_right(key).await,
            TabMenuAction::CloseAll => self.close_all().await,
        }
    }

    // ========== Unguarded operations ==========

    /// Pin or unpin a tab. Returns the new pinned state, or `None` for the home
    /// tab and unknown keys.
    pub fn toggle_pin(&self, key: &TabKey) -> Option<bool> {
        let mut state = self.state.lock();
        let pinned = state.toggle_pin(key)?;
        self.session.persist(&state);
        drop(state);

        tracing::debug!(key = %key, pinned, "Pin toggled");
        self.emit(WorkspaceEvent::PinChanged { key: key.clone(), pinned });
        Some(pinned)
    }

    /// Move `dragged` to the position of `target`.
    pub fn reorder(&self, dragged: &TabKey, target: &TabKey) -> Option<TabMove> {
        let mut state = self.state.lock();
        let moved = reorder::apply_move(&mut state, dragged, target)?;
        self.session.persist(&state);
        drop(state);

        self.emit_move(dragged, moved);
        Some(moved)
    }

    /// Whether the presentation layer should enable dragging for a tab.
    pub fn is_draggable(&self, key: &TabKey) -> bool {
        reorder::is_draggable(&self.state.lock(), key)
    }

    /// Start a drag gesture on a tab. Refused for the home tab.
    pub fn begin_drag(&self, key: &TabKey) -> bool {
        let state = self.state.lock();
        self.drag.lock().begin(&state, key)
    }

    /// Report the tab under the pointer during a drag.
    pub fn drag_over(&self, key: &TabKey) {
        self.drag.lock().hover(key);
    }

    /// The tab being dragged, if any.
    pub fn dragging(&self) -> Option<TabKey> {
        self.drag.lock().dragging().cloned()
    }

    /// Finish the drag gesture and apply the move.
    pub fn drop_drag(&self) -> Option<TabMove> {
        let mut state = self.state.lock();
        let dragged = self.drag.lock().dragging().cloned();
        let moved = self.drag.lock().finish(&mut state)?;
        self.session.persist(&state);
        drop(state);

        if let Some(dragged) = dragged {
            self.emit_move(&dragged, moved);
        }
        Some(moved)
    }

    /// Abandon the drag gesture.
    pub fn cancel_drag(&self) {
        self.drag.lock().cancel();
    }

    // ========== Internals ==========

    async fn navigate<T>(
        &self,
        op: &'static str,
        transition: impl Fn(&mut TabState) -> Result<T, WorkspaceError>,
    ) -> Navigation<T> {
        let preview = {
            let state = self.state.lock();
            let mut next = state.clone();
            transition(&mut next).map(|_| {
                let hides_active = next.active_key() != state.active_key();
                hides_active.then(|| state.active_tab().cloned()).flatten()
            })
        };

        let leaving = match preview {
            Ok(leaving) => leaving,
            Err(e) => return self.reject(op, e),
        };

        if let Some(tab) = leaving {
            if self.guard.check(&tab).await == GuardDecision::Decline {
                tracing::debug!(op, key = %tab.key(), "Navigation declined");
                return Navigation::Declined;
            }
        }

        self.commit(op, &transition)
    }

    fn commit<T>(
        &self,
        op: &'static str,
        transition: &impl Fn(&mut TabState) -> Result<T, WorkspaceError>,
    ) -> Navigation<T> {
        let mut state = self.state.lock();
        let before = state.clone();
        let value = match transition(&mut state) {
            Ok(value) => value,
            Err(e) => {
                drop(state);
                return self.reject(op, e);
            }
        };
        self.session.persist(&state);
        let after = state.clone();
        drop(state);

        tracing::debug!(op, active = %after.active_key(), tabs = after.len(), "Transition committed");
        self.publish_changes(&before, &after);
        Navigation::Completed(value)
    }

    fn reject<T>(&self, op: &'static str, error: WorkspaceError) -> Navigation<T> {
        tracing::warn!(op, error = %error, "Operation rejected");
        self.modal.inform(Notice::from_error(&error));
        Navigation::Rejected(error)
    }

    fn publish_changes(&self, before: &TabState, after: &TabState) {
        let closed: Vec<TabKey> = before
            .tabs()
            .iter()
            .filter(|tab| !after.contains(tab.key()))
            .map(|tab| tab.key().clone())
            .collect();

        if !closed.is_empty() {
            let mut documents = self.documents.write();
            for key in &closed {
                documents.remove(key);
            }
        }

        for key in closed {
            self.emit(WorkspaceEvent::TabClosed { key });
        }
        for tab in after.tabs().iter().filter(|tab| !before.contains(tab.key())) {
            self.emit(WorkspaceEvent::TabOpened { key: tab.key().clone() });
        }
        if before.active_key() != after.active_key() {
            self.emit(WorkspaceEvent::ActiveTabChanged { key: after.active_key().clone() });
        }
    }

    fn emit_move(&self, key: &TabKey, moved: TabMove) {
        self.emit(WorkspaceEvent::TabMoved { key: key.clone(), from: moved.from, to: moved.to });
    }

    fn emit(&self, event: WorkspaceEvent) {
        tracing::trace!(?event, "Workspace event");
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
