use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::Database;
use crate::error::ApiError;
use crate::models::{ArtType, Artist};

/// GET /api/v1/artists - all artists ordered by surname, name
pub async fn list() -> Result<Json<Vec<Artist>>, ApiError> {
    let pool = Database::pool().await?;

    let artists = sqlx::query_as::<_, Artist>(
        "SELECT id, name, surname, biography FROM artists ORDER BY surname, name",
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(artists))
}

#[derive(Debug, Deserialize)]
pub struct GetArtistQuery {
    #[serde(default)]
    pub expand_arts: bool,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ArtMini {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub art_type: ArtType,
}

/// GET /api/v1/artists/:id - single artist, optionally with their artworks
pub async fn get_by_id(
    Path(id): Path<Uuid>,
    Query(query): Query<GetArtistQuery>,
) -> Result<Json<Value>, ApiError> {
    let pool = Database::pool().await?;

    let artist = sqlx::query_as::<_, Artist>(
        "SELECT id, name, surname, biography FROM artists WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found(format!("Artist {} not found", id)))?;

    if !query.expand_arts {
        return Ok(Json(serde_json::to_value(&artist).unwrap_or(Value::Null)));
    }

    let arts = sqlx::query_as::<_, ArtMini>(
        "SELECT id, title, description, art_type
         FROM arts WHERE artist_id = $1 ORDER BY title",
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(json!({
        "id": artist.id,
        "name": artist.name,
        "surname": artist.surname,
        "biography": artist.biography,
        "arts": arts,
    })))
}

#[derive(Debug, Deserialize)]
pub struct CreateArtistRequest {
    pub name: String,
    pub surname: String,
    pub biography: Option<String>,
}

/// POST /api/v1/artists (admin)
pub async fn create(Json(req): Json<CreateArtistRequest>) -> Result<impl IntoResponse, ApiError> {
    if req.name.trim().is_empty() || req.surname.trim().is_empty() {
        return Err(ApiError::invalid_request("Name and surname are required"));
    }

    let pool = Database::pool().await?;

    let artist = sqlx::query_as::<_, Artist>(
        "INSERT INTO artists (name, surname, biography)
         VALUES ($1, $2, $3)
         RETURNING id, name, surname, biography",
    )
    .bind(req.name.trim())
    .bind(req.surname.trim())
    .bind(req.biography.as_deref().map(str::trim).unwrap_or_default())
    .fetch_one(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(artist)))
}

#[derive(Debug, Deserialize)]
pub struct PatchArtistRequest {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub biography: Option<String>,
}

/// PATCH /api/v1/artists/:id (admin) - partial update
pub async fn patch(
    Path(id): Path<Uuid>,
    Json(req): Json<PatchArtistRequest>,
) -> Result<Json<Artist>, ApiError> {
    let pool = Database::pool().await?;

    let artist = sqlx::query_as::<_, Artist>(
        "UPDATE artists SET
             name = COALESCE($2, name),
             surname = COALESCE($3, surname),
             biography = COALESCE($4, biography)
         WHERE id = $1
         RETURNING id, name, surname, biography",
    )
    .bind(id)
    .bind(req.name.as_deref())
    .bind(req.surname.as_deref())
    .bind(req.biography.as_deref())
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found(format!("Artist {} not found", id)))?;

    Ok(Json(artist))
}

/// DELETE /api/v1/artists/:id (admin). Blocked while the artist still has
/// artworks in the catalog.
pub async fn delete(Path(id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    let pool = Database::pool().await?;

    let (has_arts,): (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM arts WHERE artist_id = $1)")
            .bind(id)
            .fetch_one(&pool)
            .await?;
    if has_arts {
        return Err(ApiError::conflict("Cannot delete artist with arts"));
    }

    let deleted = sqlx::query("DELETE FROM artists WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found(format!("Artist {} not found", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}
