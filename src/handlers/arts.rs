use axum::extract::{Path, Query};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::Database;
use crate::error::ApiError;
use crate::models::ArtType;

#[derive(Debug, Serialize)]
pub struct ArtistDto {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub biography: String,
}

#[derive(Debug, Serialize)]
pub struct ArtDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub art_type: ArtType,
    pub image_url: Option<String>,
    pub category_id: Option<Uuid>,
    pub artist: ArtistDto,
}

#[derive(Debug, FromRow)]
struct ArtWithArtistRow {
    id: Uuid,
    title: String,
    description: String,
    price: Decimal,
    art_type: ArtType,
    image_url: Option<String>,
    category_id: Option<Uuid>,
    artist_id: Uuid,
    artist_name: String,
    artist_surname: String,
    artist_biography: String,
}

impl From<ArtWithArtistRow> for ArtDto {
    fn from(row: ArtWithArtistRow) -> Self {
        ArtDto {
            id: row.id,
            title: row.title,
            description: row.description,
            price: row.price,
            art_type: row.art_type,
            image_url: row.image_url,
            category_id: row.category_id,
            artist: ArtistDto {
                id: row.artist_id,
                name: row.artist_name,
                surname: row.artist_surname,
                biography: row.artist_biography,
            },
        }
    }
}

const ART_SELECT: &str = r#"
    SELECT a.id, a.title, a.description, a.price, a.art_type, a.image_url,
           a.category_id, a.artist_id,
           ar.name AS artist_name, ar.surname AS artist_surname,
           ar.biography AS artist_biography
    FROM arts a
    JOIN artists ar ON ar.id = a.artist_id
"#;

#[derive(Debug, Deserialize)]
pub struct ListArtsQuery {
    #[serde(rename = "type")]
    pub art_type: Option<ArtType>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// GET /api/v1/arts - paged catalog listing with optional type/search filters.
/// Total match count is exposed via the X-Total-Count header.
pub async fn list(Query(query): Query<ListArtsQuery>) -> Result<impl IntoResponse, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(20).clamp(1, 100);
    let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let pattern = search.map(|s| format!("%{}%", s));

    let pool = Database::pool().await?;

    let (total,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM arts a
         WHERE ($1::text IS NULL OR a.art_type = $1)
           AND ($2::text IS NULL OR a.title ILIKE $2 OR a.description ILIKE $2)",
    )
    .bind(query.art_type)
    .bind(pattern.as_deref())
    .fetch_one(&pool)
    .await?;

    let sql = format!(
        "{ART_SELECT}
         WHERE ($1::text IS NULL OR a.art_type = $1)
           AND ($2::text IS NULL OR a.title ILIKE $2 OR a.description ILIKE $2)
         ORDER BY a.title
         LIMIT $3 OFFSET $4"
    );
    let rows = sqlx::query_as::<_, ArtWithArtistRow>(&sql)
        .bind(query.art_type)
        .bind(pattern.as_deref())
        .bind(page_size)
        .bind((page - 1) * page_size)
        .fetch_all(&pool)
        .await?;

    let items: Vec<ArtDto> = rows.into_iter().map(ArtDto::from).collect();

    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&total.to_string()) {
        headers.insert(header::HeaderName::from_static("x-total-count"), value);
    }
    Ok((headers, Json(items)))
}

/// GET /api/v1/arts/:id
pub async fn get_by_id(Path(id): Path<Uuid>) -> Result<Json<ArtDto>, ApiError> {
    let pool = Database::pool().await?;

    let sql = format!("{ART_SELECT} WHERE a.id = $1");
    let row = sqlx::query_as::<_, ArtWithArtistRow>(&sql)
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Artwork {} not found", id)))?;

    Ok(Json(ArtDto::from(row)))
}

#[derive(Debug, Deserialize)]
pub struct RandomQuery {
    pub limit: Option<i64>,
    #[serde(rename = "type")]
    pub art_type: Option<ArtType>,
}

/// GET /api/v1/arts/random - a random sample for the landing page
pub async fn random(Query(query): Query<RandomQuery>) -> Result<Json<Vec<ArtDto>>, ApiError> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let pool = Database::pool().await?;

    let sql = format!(
        "{ART_SELECT}
         WHERE ($1::text IS NULL OR a.art_type = $1)
         ORDER BY random()
         LIMIT $2"
    );
    let rows = sqlx::query_as::<_, ArtWithArtistRow>(&sql)
        .bind(query.art_type)
        .bind(limit)
        .fetch_all(&pool)
        .await?;

    Ok(Json(rows.into_iter().map(ArtDto::from).collect()))
}

#[derive(Debug, Serialize, FromRow)]
pub struct TypeCount {
    pub art_type: ArtType,
    pub count: i64,
}

/// GET /api/v1/arts/categories - histogram of artwork types in the catalog
pub async fn categories() -> Result<Json<Vec<TypeCount>>, ApiError> {
    let pool = Database::pool().await?;

    let rows = sqlx::query_as::<_, TypeCount>(
        "SELECT art_type, COUNT(*) AS count
         FROM arts
         WHERE art_type <> 'Unknown'
         GROUP BY art_type
         ORDER BY art_type",
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct CreateArtRequest {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    #[serde(rename = "type", default)]
    pub art_type: ArtType,
    pub image_url: Option<String>,
    pub artist_id: Uuid,
    pub category_id: Option<Uuid>,
}

/// POST /api/v1/arts (admin)
pub async fn create(Json(req): Json<CreateArtRequest>) -> Result<impl IntoResponse, ApiError> {
    if req.title.trim().is_empty() || req.description.trim().is_empty() {
        return Err(ApiError::invalid_request("Title and description are required"));
    }

    let pool = Database::pool().await?;

    let (artist_exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM artists WHERE id = $1)")
            .bind(req.artist_id)
            .fetch_one(&pool)
            .await?;
    if !artist_exists {
        return Err(ApiError::not_found(format!("Artist {} not found", req.artist_id)));
    }

    let (id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO arts (title, description, price, art_type, image_url, artist_id, category_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING id",
    )
    .bind(req.title.trim())
    .bind(req.description.trim())
    .bind(req.price)
    .bind(req.art_type)
    .bind(&req.image_url)
    .bind(req.artist_id)
    .bind(req.category_id)
    .fetch_one(&pool)
    .await?;

    let sql = format!("{ART_SELECT} WHERE a.id = $1");
    let row = sqlx::query_as::<_, ArtWithArtistRow>(&sql)
        .bind(id)
        .fetch_one(&pool)
        .await?;

    Ok((StatusCode::CREATED, Json(ArtDto::from(row))))
}

#[derive(Debug, Deserialize)]
pub struct PatchArtRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    #[serde(rename = "type")]
    pub art_type: Option<ArtType>,
    pub image_url: Option<String>,
}

/// PATCH /api/v1/arts/:id (admin) - partial update; absent fields are kept.
/// Existing order lines keep their price snapshots regardless of price edits.
pub async fn patch(
    Path(id): Path<Uuid>,
    Json(req): Json<PatchArtRequest>,
) -> Result<Json<ArtDto>, ApiError> {
    let pool = Database::pool().await?;

    let updated = sqlx::query(
        "UPDATE arts SET
             title = COALESCE($2, title),
             description = COALESCE($3, description),
             price = COALESCE($4, price),
             art_type = COALESCE($5, art_type),
             image_url = COALESCE($6, image_url)
         WHERE id = $1",
    )
    .bind(id)
    .bind(req.title.as_deref().map(str::trim))
    .bind(req.description.as_deref().map(str::trim))
    .bind(req.price)
    .bind(req.art_type)
    .bind(req.image_url.as_deref())
    .execute(&pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(ApiError::not_found(format!("Artwork {} not found", id)));
    }

    let sql = format!("{ART_SELECT} WHERE a.id = $1");
    let row = sqlx::query_as::<_, ArtWithArtistRow>(&sql)
        .bind(id)
        .fetch_one(&pool)
        .await?;

    Ok(Json(ArtDto::from(row)))
}

/// DELETE /api/v1/arts/:id (admin)
pub async fn delete(Path(id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    let pool = Database::pool().await?;

    let (referenced,): (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM order_items WHERE art_id = $1)")
            .bind(id)
            .fetch_one(&pool)
            .await?;
    if referenced {
        return Err(ApiError::conflict("Cannot delete artwork referenced by orders"));
    }

    let deleted = sqlx::query("DELETE FROM arts WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found(format!("Artwork {} not found", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}
