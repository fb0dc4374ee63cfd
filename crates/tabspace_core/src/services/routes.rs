//! Route and breadcrumb resolution.
//!
//! The workspace consumes two lookups: a route resolver that validates keys and
//! supplies the document to mount, and a breadcrumb resolver used once per tab
//! to derive its label. [`RouteTable`] implements both from a menu tree.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::WorkspaceError;
use crate::models::{Breadcrumb, ComponentRef, Route, TabKey};

/// Resolves a normalized key to its route.
pub trait RouteResolver: Send + Sync {
    fn resolve(&self, key: &TabKey) -> Option<Route>;
}

/// Resolves a normalized key to its breadcrumb chain, outermost first.
pub trait BreadcrumbResolver: Send + Sync {
    fn breadcrumbs(&self, key: &TabKey) -> Vec<Breadcrumb>;
}

/// Breadcrumb resolver for hosts without a menu; labels fall back to route names.
pub struct NoBreadcrumbs;

impl BreadcrumbResolver for NoBreadcrumbs {
    fn breadcrumbs(&self, _key: &TabKey) -> Vec<Breadcrumb> {
        Vec::new()
    }
}

/// A node of the navigation menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNode {
    /// Display title.
    pub title: String,
    /// Route path for leaf pages.
    #[serde(default)]
    pub path: Option<String>,
    /// Component identifier; defaults to the path.
    #[serde(default)]
    pub component: Option<String>,
    /// Nested entries.
    #[serde(default)]
    pub children: Vec<MenuNode>,
}

/// Route table built from a menu tree.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: HashMap<TabKey, Route>,
    crumbs: HashMap<TabKey, Vec<Breadcrumb>>,
}

impl RouteTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from menu nodes. Every node with a path becomes a route.
    pub fn from_menu(menu: &[MenuNode]) -> Result<Self, WorkspaceError> {
        let mut table = Self::new();
        let mut trail = Vec::new();
        for node in menu {
            table.add_node(node, &mut trail)?;
        }
        tracing::debug!(routes = table.len(), "Route table built");
        Ok(table)
    }

    /// Build a table from a JSON menu tree.
    pub fn from_json(json: &str) -> Result<Self, WorkspaceError> {
        let menu: Vec<MenuNode> = serde_json::from_str(json)
            .map_err(|e| WorkspaceError::config(format!("Invalid menu definition: {e}")))?;
        Self::from_menu(&menu)
    }

    fn add_node(
        &mut self,
        node: &MenuNode,
        trail: &mut Vec<Breadcrumb>,
    ) -> Result<(), WorkspaceError> {
        trail.push(Breadcrumb::new(node.title.clone(), node.path.clone()));

        if let Some(path) = &node.path {
            let key = TabKey::parse(path)?;
            let component = node.component.clone().unwrap_or_else(|| key.to_string());
            self.routes.insert(
                key.clone(),
                Route::new(key.clone(), node.title.clone(), Arc::new(ComponentRef::new(component))),
            );
            self.crumbs.insert(key, trail.clone());
        }

        for child in &node.children {
            self.add_node(child, trail)?;
        }

        trail.pop();
        Ok(())
    }

    /// Register a top-level route.
    pub fn add(&mut self, path: &str, title: &str, component: &str) -> Result<(), WorkspaceError> {
        let node = MenuNode {
            title: title.to_string(),
            path: Some(path.to_string()),
            component: Some(component.to_string()),
            children: Vec::new(),
        };
        self.add_node(&node, &mut Vec::new())
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the table has no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl RouteResolver for RouteTable {
    fn resolve(&self, key: &TabKey) -> Option<Route> {
        self.routes.get(key).cloned()
    }
}

impl BreadcrumbResolver for RouteTable {
    fn breadcrumbs(&self, key: &TabKey) -> Vec<Breadcrumb> {
        self.crumbs.get(key).cloned().unwrap_or_default()
    }
}
