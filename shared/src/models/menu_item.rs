//! Menu Item Model

use serde::{Deserialize, Serialize};

/// Menu item entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Smallest currency unit, always > 0
    pub price: i64,
    pub image_url: Option<String>,
    /// Soft-disable flag; items with order history are never hard-deleted
    pub is_available: bool,
    /// Allergen tags, stored as a JSON array
    #[cfg_attr(feature = "db", sqlx(json))]
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Menu item joined with its category name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItemWithCategory {
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub item: MenuItem,
    pub category_name: Option<String>,
}

/// Create menu item payload
///
/// `is_available` defaults to true and `allergens` to empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
    pub allergens: Option<Vec<String>>,
}

/// Update menu item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub category_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
    pub allergens: Option<Vec<String>>,
}

/// Menu listing filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemQuery {
    pub category_id: Option<i64>,
    #[serde(default)]
    pub available_only: bool,
}
