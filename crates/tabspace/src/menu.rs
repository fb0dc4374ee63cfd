//! Menu loading, with a built-in menu used when no menu file is given.

use std::path::Path;

use tabspace_core::{RouteTable, WorkspaceError};

const DEMO_MENU: &str = r#"[
    { "title": "Home", "path": "/home", "component": "dashboard" },
    { "title": "Sales", "children": [
        { "title": "Orders", "path": "/sales/orders", "component": "order-grid" },
        { "title": "Refunds", "path": "/sales/refunds", "component": "refund-grid" },
        { "title": "Customers", "path": "/sales/customers" }
    ] },
    { "title": "Inventory", "children": [
        { "title": "Products", "path": "/inventory/products" },
        { "title": "Warehouses", "path": "/inventory/warehouses" }
    ] },
    { "title": "Settings", "path": "/settings" }
]"#;

/// Build the route table from a menu file, or from the demo menu.
pub fn load_menu(path: Option<&Path>) -> Result<RouteTable, WorkspaceError> {
    let Some(path) = path else {
        return RouteTable::from_json(DEMO_MENU);
    };
    let json = std::fs::read_to_string(path).map_err(|e| {
        WorkspaceError::config(format!("Failed to read menu '{}': {e}", path.display()))
    })?;
    RouteTable::from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabspace_core::{RouteResolver, TabKey};

    #[test]
    fn test_demo_menu_has_home() {
        let table = load_menu(None).unwrap();
        assert_eq!(table.len(), 7);
        assert!(table.resolve(&TabKey::parse("/home").unwrap()).is_some());
    }

    #[test]
    fn test_missing_menu_file_is_config_error() {
        let err = load_menu(Some(Path::new("/nonexistent/tabspace/menu.json"))).err().unwrap();
        assert!(matches!(err, WorkspaceError::Config { .. }));
        assert_eq!(err.category(), "Config");
    }
}
