//! Collaborator boundaries consumed by the workspace.
//!
//! - `routes` - Route and breadcrumb resolvers, menu-tree route table
//! - `modal` - Confirmation and informational dialogs
//! - `unsaved` - Registry of per-tab unsaved-work handles
//! - `storage` - Key-value stores for tab persistence
//! - `session` - Tab snapshot read/write over a store

pub mod modal;
pub mod routes;
pub mod session;
pub mod storage;
pub mod unsaved;

pub use modal::{ConfirmKind, ConfirmRequest, ConfirmResponder, ModalService, Notice};
pub use routes::{BreadcrumbResolver, MenuNode, NoBreadcrumbs, RouteResolver, RouteTable};
pub use session::{RestoredSession, SessionStore};
pub use storage::{MemoryStore, SqliteStore, TabStore};
pub use unsaved::{UnsavedWork, UnsavedWorkRegistry};
