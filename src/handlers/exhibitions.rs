use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::Database;
use crate::error::ApiError;
use crate::models::Availability;
use crate::services::tickets;

/// Listing view: exhibition fields plus derived sales state.
#[derive(Debug, Serialize, FromRow)]
pub struct ExhibitionSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub capacity: i32,
    pub sold_count: i64,
    pub is_sold_out: bool,
}

const SUMMARY_SELECT: &str = r#"
    SELECT e.id, e.name, e.description, e.image_url, e.start_date, e.end_date,
           e.capacity,
           COUNT(t.id) AS sold_count,
           COUNT(t.id) >= e.capacity AS is_sold_out
    FROM exhibitions e
    LEFT JOIN tickets t ON t.exhibition_id = e.id
    GROUP BY e.id
"#;

/// GET /api/v1/exhibitions
pub async fn list() -> Result<Json<Vec<ExhibitionSummary>>, ApiError> {
    let pool = Database::pool().await?;

    let sql = format!("{SUMMARY_SELECT} ORDER BY e.start_date");
    let items = sqlx::query_as::<_, ExhibitionSummary>(&sql)
        .fetch_all(&pool)
        .await?;

    Ok(Json(items))
}

/// GET /api/v1/exhibitions/:id
pub async fn get_by_id(Path(id): Path<Uuid>) -> Result<Json<ExhibitionSummary>, ApiError> {
    let pool = Database::pool().await?;

    let sql = format!(
        "SELECT * FROM ({SUMMARY_SELECT}) s WHERE s.id = $1"
    );
    let item = sqlx::query_as::<_, ExhibitionSummary>(&sql)
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Exhibition {} not found", id)))?;

    Ok(Json(item))
}

/// GET /api/v1/exhibitions/:id/availability
pub async fn availability(Path(id): Path<Uuid>) -> Result<Json<Availability>, ApiError> {
    let availability = tickets::availability(id).await?;
    Ok(Json(availability))
}

#[derive(Debug, Deserialize)]
pub struct CreateExhibitionRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub image_url: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub capacity: Option<i32>,
}

const DEFAULT_CAPACITY: i32 = 100;

/// POST /api/v1/exhibitions (admin)
pub async fn create(
    Json(req): Json<CreateExhibitionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::invalid_request("Name is required"));
    }
    let capacity = req.capacity.unwrap_or(DEFAULT_CAPACITY);
    if capacity < 0 {
        return Err(ApiError::invalid_request("Capacity must not be negative"));
    }

    let pool = Database::pool().await?;

    let exhibition = sqlx::query_as::<_, crate::models::Exhibition>(
        "INSERT INTO exhibitions (name, description, image_url, start_date, end_date, capacity)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id, name, description, image_url, start_date, end_date, capacity",
    )
    .bind(req.name.trim())
    .bind(&req.description)
    .bind(&req.image_url)
    .bind(req.start_date)
    .bind(req.end_date)
    .bind(capacity)
    .fetch_one(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(exhibition)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateExhibitionRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub image_url: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub capacity: i32,
}

/// PUT /api/v1/exhibitions/:id (admin) - full replacement
pub async fn update(
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateExhibitionRequest>,
) -> Result<Json<crate::models::Exhibition>, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::invalid_request("Name is required"));
    }
    if req.capacity < 0 {
        return Err(ApiError::invalid_request("Capacity must not be negative"));
    }

    let pool = Database::pool().await?;

    let exhibition = sqlx::query_as::<_, crate::models::Exhibition>(
        "UPDATE exhibitions SET
             name = $2, description = $3, image_url = $4,
             start_date = $5, end_date = $6, capacity = $7
         WHERE id = $1
         RETURNING id, name, description, image_url, start_date, end_date, capacity",
    )
    .bind(id)
    .bind(req.name.trim())
    .bind(&req.description)
    .bind(&req.image_url)
    .bind(req.start_date)
    .bind(req.end_date)
    .bind(req.capacity)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found(format!("Exhibition {} not found", id)))?;

    Ok(Json(exhibition))
}

/// DELETE /api/v1/exhibitions/:id (admin). Cascades to the exhibition's
/// tickets per the schema.
pub async fn delete(Path(id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    let pool = Database::pool().await?;

    let deleted = sqlx::query("DELETE FROM exhibitions WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found(format!("Exhibition {} not found", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}
