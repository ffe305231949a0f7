//! Response types (Serialize)

use inventory_chat_core::InventoryItem;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
#[non_exhaustive]
pub struct VersionResponse {
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CloseSessionResponse {
    pub closed: bool,
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct InventoryResponse {
    pub items: Vec<InventoryItem>,
}
