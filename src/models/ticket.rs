use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Fare category. Each type has a fixed price; see
/// [`crate::services::tickets::ticket_price`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "PascalCase")]
pub enum TicketType {
    Standard,
    Reduced,
}

/// Append-only sale record. Created only through the issuance rule, never
/// mutated or deleted in normal flow.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: Uuid,
    pub price: Decimal,
    pub ticket_type: TicketType,
    pub exhibition_id: Uuid,
    pub user_id: Option<Uuid>,
    pub email: String,
    pub payment_method: String,
    pub purchase_date: DateTime<Utc>,
}
