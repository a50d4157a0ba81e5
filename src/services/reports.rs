use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use crate::database::{Database, DatabaseError};
use crate::error::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Pool(#[from] DatabaseError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Pool(e) => e.into(),
            ReportError::Database(e) => e.into(),
        }
    }
}

/// Headline numbers for the admin dashboard. Revenue combines order totals
/// and ticket sales.
#[derive(Debug, Serialize, FromRow)]
pub struct DashboardStats {
    pub total_revenue: Decimal,
    pub total_orders: i64,
    pub tickets_sold: i64,
    pub total_arts: i64,
}

pub async fn dashboard_stats() -> Result<DashboardStats, ReportError> {
    let pool = Database::pool().await?;

    let stats = sqlx::query_as::<_, DashboardStats>(
        r#"
        SELECT
            (SELECT COALESCE(SUM(total_amount), 0) FROM orders)
              + (SELECT COALESCE(SUM(price), 0) FROM tickets) AS total_revenue,
            (SELECT COUNT(*) FROM orders)  AS total_orders,
            (SELECT COUNT(*) FROM tickets) AS tickets_sold,
            (SELECT COUNT(*) FROM arts)    AS total_arts
        "#,
    )
    .fetch_one(&pool)
    .await?;

    Ok(stats)
}

/// One point of the revenue chart: a calendar day and the revenue booked on
/// it. Days with no sales still appear, with zero revenue.
#[derive(Debug, Serialize, FromRow)]
pub struct RevenuePoint {
    pub date: chrono::NaiveDate,
    pub revenue: Decimal,
}

/// Daily revenue for the last 31 calendar days (today and the 30 before it),
/// combining order totals and ticket prices. Zero-filled via generate_series
/// so the chart has a point for every day in the range.
pub async fn revenue_chart() -> Result<Vec<RevenuePoint>, ReportError> {
    let pool = Database::pool().await?;

    let rows = sqlx::query_as::<_, RevenuePoint>(
        r#"
        SELECT d.day::date AS date,
               COALESCE(o.revenue, 0) + COALESCE(t.revenue, 0) AS revenue
        FROM generate_series(
            CURRENT_DATE - 30, CURRENT_DATE, INTERVAL '1 day'
        ) AS d(day)
        LEFT JOIN (
            SELECT order_date::date AS day, SUM(total_amount) AS revenue
            FROM orders GROUP BY order_date::date
        ) o ON o.day = d.day::date
        LEFT JOIN (
            SELECT purchase_date::date AS day, SUM(price) AS revenue
            FROM tickets GROUP BY purchase_date::date
        ) t ON t.day = d.day::date
        ORDER BY d.day
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(rows)
}

/// Top exhibitions by tickets sold, with per-exhibition revenue.
#[derive(Debug, Serialize, FromRow)]
pub struct TopExhibition {
    pub exhibition_name: String,
    pub ticket_count: i64,
    pub revenue: Decimal,
}

pub async fn top_exhibitions(limit: i64) -> Result<Vec<TopExhibition>, ReportError> {
    let pool = Database::pool().await?;

    let rows = sqlx::query_as::<_, TopExhibition>(
        r#"
        SELECT e.name AS exhibition_name,
               COUNT(t.id) AS ticket_count,
               COALESCE(SUM(t.price), 0) AS revenue
        FROM exhibitions e
        LEFT JOIN tickets t ON t.exhibition_id = e.id
        GROUP BY e.id, e.name
        ORDER BY ticket_count DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(&pool)
    .await?;

    Ok(rows)
}
