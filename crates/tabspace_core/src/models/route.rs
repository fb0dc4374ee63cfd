//! Route and breadcrumb models supplied by the host's resolvers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::tab::TabKey;

/// A renderable document that a route points to.
///
/// The workspace never renders documents; it resolves one per tab when the tab
/// opens and hands the cached value back to the host.
pub trait Document: Send + Sync + fmt::Debug {
    /// Stable identifier the host uses to mount the document.
    fn component_id(&self) -> &str;
}

/// Document named by a component identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRef(String);

impl ComponentRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl Document for ComponentRef {
    fn component_id(&self) -> &str {
        &self.0
    }
}

/// Route descriptor for a tab key.
#[derive(Debug, Clone)]
pub struct Route {
    /// Normalized path.
    pub path: TabKey,
    /// Default display name.
    pub name: String,
    /// Document mounted for this route.
    pub document: Arc<dyn Document>,
}

impl Route {
    /// Create a route.
    pub fn new(path: TabKey, name: impl Into<String>, document: Arc<dyn Document>) -> Self {
        Self { path, name: name.into(), document }
    }
}

/// One link in a breadcrumb chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// Display title.
    pub title: String,
    /// Path, if the crumb is itself navigable.
    pub path: Option<String>,
}

impl Breadcrumb {
    pub fn new(title: impl Into<String>, path: Option<String>) -> Self {
        Self { title: title.into(), path }
    }
}
