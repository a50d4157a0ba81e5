use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::Database;
use crate::error::ApiError;
use crate::models::Category;

/// GET /api/v1/categories
pub async fn list() -> Result<Json<Vec<Category>>, ApiError> {
    let pool = Database::pool().await?;

    let categories = sqlx::query_as::<_, Category>(
        "SELECT id, name, parent_category_id FROM categories ORDER BY name",
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(categories))
}

/// GET /api/v1/categories/:id
pub async fn get_by_id(Path(id): Path<Uuid>) -> Result<Json<Category>, ApiError> {
    let pool = Database::pool().await?;

    let category = sqlx::query_as::<_, Category>(
        "SELECT id, name, parent_category_id FROM categories WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found(format!("Category {} not found", id)))?;

    Ok(Json(category))
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub parent_category_id: Option<Uuid>,
}

/// POST /api/v1/categories (admin)
pub async fn create(
    Json(req): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::invalid_request("Name is required"));
    }

    let pool = Database::pool().await?;

    if let Some(parent) = req.parent_category_id {
        let (parent_exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1)")
                .bind(parent)
                .fetch_one(&pool)
                .await?;
        if !parent_exists {
            return Err(ApiError::not_found(format!("Category {} not found", parent)));
        }
    }

    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (name, parent_category_id)
         VALUES ($1, $2)
         RETURNING id, name, parent_category_id",
    )
    .bind(req.name.trim())
    .bind(req.parent_category_id)
    .fetch_one(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

#[derive(Debug, Deserialize)]
pub struct PatchCategoryRequest {
    pub name: Option<String>,
    pub parent_category_id: Option<Uuid>,
}

/// PATCH /api/v1/categories/:id (admin) - partial update. Passing a parent id
/// re-parents the category; absent fields are kept.
pub async fn patch(
    Path(id): Path<Uuid>,
    Json(req): Json<PatchCategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    if req.parent_category_id == Some(id) {
        return Err(ApiError::invalid_request("Category cannot be its own parent"));
    }

    let pool = Database::pool().await?;

    let category = sqlx::query_as::<_, Category>(
        "UPDATE categories SET
             name = COALESCE($2, name),
             parent_category_id = COALESCE($3, parent_category_id)
         WHERE id = $1
         RETURNING id, name, parent_category_id",
    )
    .bind(id)
    .bind(req.name.as_deref().map(str::trim))
    .bind(req.parent_category_id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found(format!("Category {} not found", id)))?;

    Ok(Json(category))
}

/// DELETE /api/v1/categories/:id (admin). Blocked while artworks or child
/// categories still reference it.
pub async fn delete(Path(id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    let pool = Database::pool().await?;

    let (referenced,): (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM arts WHERE category_id = $1)
             OR EXISTS (SELECT 1 FROM categories WHERE parent_category_id = $1)",
    )
    .bind(id)
    .fetch_one(&pool)
    .await?;
    if referenced {
        return Err(ApiError::conflict("Cannot delete category in use"));
    }

    let deleted = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found(format!("Category {} not found", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}
