//! Data models for the tab workspace.
//!
//! - `tab` - TabKey, Tab
//! - `route` - Route, Breadcrumb, Document
//! - `event` - WorkspaceEvent

pub mod event;
pub mod route;
pub mod tab;

pub use event::WorkspaceEvent;
pub use route::{Breadcrumb, ComponentRef, Document, Route};
pub use tab::{Tab, TabKey};
