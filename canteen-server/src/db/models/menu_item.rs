//! Menu Item Model

use serde::{Deserialize, Serialize};

/// Menu item model
///
/// "Deleting" a menu item only flips `is_available`; rows are never removed
/// so historical order lines keep a valid reference.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub is_available: bool,
}

/// Create menu item payload
///
/// `name` and `price` are required but optional here so the handler can
/// report them as validation errors.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuItemCreate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub is_available: Option<bool>,
}

/// Update menu item payload — omitted fields keep their previous value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub is_available: Option<bool>,
}
