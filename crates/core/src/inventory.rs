use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the caller's inventory view, re-fetched after every executed action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InventoryItem {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub quantity: i32,
    pub location: Option<String>,
    pub owner: String,
    pub updated_at: DateTime<Utc>,
}
