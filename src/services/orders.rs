use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::database::{Database, DatabaseError};
use crate::error::ApiError;
use crate::models::{Artwork, Order, OrderItem};
use crate::services::customers;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order must contain at least one art item")]
    EmptyOrder,
    #[error("One or more art ids are invalid")]
    UnknownArtwork,
    #[error(transparent)]
    Pool(#[from] DatabaseError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::EmptyOrder => {
                ApiError::invalid_request("Order must contain at least one art item")
            }
            OrderError::UnknownArtwork => {
                ApiError::invalid_reference("One or more art ids are invalid")
            }
            OrderError::Pool(e) => e.into(),
            OrderError::Database(e) => e.into(),
        }
    }
}

/// Order total is the sum of the per-line price snapshots.
pub fn order_total(snapshots: &[Decimal]) -> Decimal {
    snapshots.iter().fold(Decimal::ZERO, |acc, p| acc + p)
}

/// Duplicate ids collapse: an order for [a, b, b] is a two-line order.
/// First-seen request order is preserved.
pub fn dedupe_art_ids(art_ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::new();
    art_ids
        .iter()
        .filter(|id| seen.insert(**id))
        .copied()
        .collect()
}

/// Place a guest order: snapshot each artwork's current price into an order
/// line and persist order plus lines in one transaction.
pub async fn place_order(email: &str, art_ids: &[Uuid]) -> Result<Order, OrderError> {
    if art_ids.is_empty() {
        return Err(OrderError::EmptyOrder);
    }

    let requested = dedupe_art_ids(art_ids);

    let pool = Database::pool().await?;

    let artworks = sqlx::query_as::<_, Artwork>(
        "SELECT id, title, description, price, art_type, image_url, artist_id, category_id
         FROM arts WHERE id = ANY($1)",
    )
    .bind(&requested)
    .fetch_all(&pool)
    .await?;

    if artworks.len() != requested.len() {
        return Err(OrderError::UnknownArtwork);
    }

    let total = order_total(&artworks.iter().map(|a| a.price).collect::<Vec<_>>());

    let mut tx = pool.begin().await?;

    let customer = customers::resolve_or_create(&mut *tx, email).await?;

    let order = sqlx::query_as::<_, Order>(
        "INSERT INTO orders (customer_id, total_amount)
         VALUES ($1, $2)
         RETURNING id, customer_id, order_date, total_amount",
    )
    .bind(customer.id)
    .bind(total)
    .fetch_one(&mut *tx)
    .await?;

    for artwork in &artworks {
        sqlx::query(
            "INSERT INTO order_items (order_id, art_id, unit_price_snapshot)
             VALUES ($1, $2, $3)",
        )
        .bind(order.id)
        .bind(artwork.id)
        .bind(artwork.price)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(order = %order.id, items = artworks.len(), %total, "placed order");
    Ok(order)
}

/// An order joined with its lines, for the admin listing.
#[derive(Debug, serde::Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// All orders, newest first, each with its lines.
pub async fn list_orders() -> Result<Vec<OrderWithItems>, OrderError> {
    let pool = Database::pool().await?;

    let orders = sqlx::query_as::<_, Order>(
        "SELECT id, customer_id, order_date, total_amount
         FROM orders ORDER BY order_date DESC",
    )
    .fetch_all(&pool)
    .await?;

    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, art_id, unit_price_snapshot FROM order_items",
    )
    .fetch_all(&pool)
    .await?;

    let mut by_order: std::collections::HashMap<Uuid, Vec<OrderItem>> =
        std::collections::HashMap::new();
    for item in items {
        by_order.entry(item.order_id).or_default().push(item);
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let items = by_order.remove(&order.id).unwrap_or_default();
            OrderWithItems { order, items }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_sums_snapshots() {
        let prices = vec![Decimal::new(12550, 2), Decimal::new(999, 2)];
        assert_eq!(order_total(&prices), Decimal::new(13549, 2));
        assert_eq!(order_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn duplicate_ids_collapse_preserving_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(dedupe_art_ids(&[a, b, b]), vec![a, b]);
        assert_eq!(dedupe_art_ids(&[b, a, b, a]), vec![b, a]);
        assert_eq!(dedupe_art_ids(&[]), Vec::<Uuid>::new());
    }
}
