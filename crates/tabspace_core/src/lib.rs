//! Core of the Tabspace tabbed document workspace.
//!
//! This crate owns everything below the presentation layer:
//!
//! - **error**: Error taxonomy with user-facing categories and hints
//! - **models**: Tab keys, tabs, routes, breadcrumbs and workspace events
//! - **services**: Route resolution, modals, unsaved-work registry, persistence
//! - **state**: The tab state machine
//! - **guard**: Unsaved-work confirmation before leaving the active tab
//! - **reorder**: Drag-and-drop reordering
//! - **context_menu**: Per-tab context menu entries
//! - **workspace**: The single owner tying it all together
//! - **logging**: Structured logging setup

pub mod config;
pub mod context_menu;
pub mod error;
pub mod guard;
pub mod logging;
pub mod models;
pub mod reorder;
pub mod services;
pub mod state;
pub mod workspace;

#[cfg(test)]
mod test_support;

pub use config::WorkspaceConfig;
pub use context_menu::{build_tab_menu, TabMenuAction, TabMenuEntry};
pub use error::{ErrorInfo, WorkspaceError};
pub use guard::{GuardDecision, NavigationGuard};
pub use models::{Breadcrumb, ComponentRef, Document, Route, Tab, TabKey, WorkspaceEvent};
pub use reorder::{ReorderController, TabMove};
pub use services::{
    BreadcrumbResolver, ConfirmKind, ConfirmRequest, ConfirmResponder, MemoryStore, MenuNode,
    ModalService, Notice, RouteResolver, RouteTable, SqliteStore, TabStore, UnsavedWork,
    UnsavedWorkRegistry,
};
pub use state::{OpenOutcome, TabState};
pub use workspace::{Navigation, Workspace, WorkspaceBuilder};
