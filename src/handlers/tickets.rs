use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::TicketType;
use crate::services::tickets::{self, IssueTicketRequest};

#[derive(Debug, Deserialize)]
pub struct BuyTicketRequest {
    pub exhibition_id: Uuid,
    pub email: String,
    pub payment_method: String,
    #[serde(rename = "type")]
    pub ticket_type: TicketType,
}

/// POST /api/v1/tickets/buy - purchase one ticket for an exhibition.
///
/// Capacity-bounded: sold-out exhibitions reject with CAPACITY_EXCEEDED.
/// Resolves or creates the guest customer for the given email as part of the
/// same transaction.
pub async fn buy(Json(req): Json<BuyTicketRequest>) -> Result<Json<serde_json::Value>, ApiError> {
    if req.email.trim().is_empty() || !req.email.contains('@') {
        return Err(ApiError::invalid_request("A valid email is required"));
    }
    if req.payment_method.trim().is_empty() {
        return Err(ApiError::invalid_request("Payment method is required"));
    }

    let ticket = tickets::issue_ticket(IssueTicketRequest {
        exhibition_id: req.exhibition_id,
        email: req.email.trim().to_string(),
        payment_method: req.payment_method.trim().to_string(),
        ticket_type: req.ticket_type,
    })
    .await?;

    Ok(Json(json!({
        "ticket_id": ticket.id,
        "customer_id": ticket.user_id,
        "price": ticket.price,
    })))
}
