use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::services::orders::{self, OrderWithItems};

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub email: String,
    pub art_ids: Vec<Uuid>,
}

/// POST /api/v1/orders - place a guest order for one or more artworks.
/// Each line snapshots the artwork's current price.
pub async fn create(Json(req): Json<CreateOrderRequest>) -> Result<impl IntoResponse, ApiError> {
    if req.email.trim().is_empty() || !req.email.contains('@') {
        return Err(ApiError::invalid_request("A valid email is required"));
    }

    let order = orders::place_order(req.email.trim(), &req.art_ids).await?;

    Ok((StatusCode::CREATED, Json(json!({ "id": order.id }))))
}

/// GET /api/v1/orders (admin) - all orders, newest first, with their lines
pub async fn list() -> Result<Json<Vec<OrderWithItems>>, ApiError> {
    let orders = orders::list_orders().await?;
    Ok(Json(orders))
}
