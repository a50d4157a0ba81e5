use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{self, Claims};
use crate::database::Database;
use crate::error::ApiError;
use crate::models::{User, UserKind};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/v1/admin/login - authenticate an admin account and issue a
/// bearer JWT (issuer ArtGalleryBackend, audience artgallery_api, 2h expiry,
/// role claim Admin).
pub async fn login(Json(req): Json<LoginRequest>) -> Result<Json<Value>, ApiError> {
    let pool = Database::pool().await?;

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, username, role, created_at, is_active,
               password_hash, shipping_address, phone_number
        FROM users
        WHERE username = $1 AND role = 'admin' AND is_active
        "#,
    )
    .bind(&req.username)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let UserKind::Admin { password_hash } = &user.kind else {
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    if !auth::verify_password(&req.password, password_hash) {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = auth::generate_jwt(&Claims::admin(&user.username))?;

    tracing::info!(username = %user.username, "admin login");
    Ok(Json(json!({ "token": token })))
}
