use axum::Json;

use crate::error::ApiError;
use crate::services::reports::{self, DashboardStats, RevenuePoint, TopExhibition};

/// GET /api/v1/reports/dashboard-stats (admin)
pub async fn dashboard_stats() -> Result<Json<DashboardStats>, ApiError> {
    let stats = reports::dashboard_stats().await?;
    Ok(Json(stats))
}

/// GET /api/v1/reports/revenue-chart (admin) - last-31-days daily revenue
pub async fn revenue_chart() -> Result<Json<Vec<RevenuePoint>>, ApiError> {
    let points = reports::revenue_chart().await?;
    Ok(Json(points))
}

/// GET /api/v1/reports/top-exhibitions (admin) - top 5 by tickets sold
pub async fn top_exhibitions() -> Result<Json<Vec<TopExhibition>>, ApiError> {
    let rows = reports::top_exhibitions(5).await?;
    Ok(Json(rows))
}
