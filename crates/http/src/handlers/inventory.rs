use axum::{Json, extract::State};
use std::sync::Arc;

use crate::AppState;
use crate::api_error::ApiError;
use crate::auth::Caller;
use crate::response_types::InventoryResponse;

pub async fn get_inventory(
    State(state): State<Arc<AppState>>,
    Caller(identity): Caller,
) -> Result<Json<InventoryResponse>, ApiError> {
    let items = state.chat.inventory(&identity).await?;
    Ok(Json(InventoryResponse { items }))
}
