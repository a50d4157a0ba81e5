use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};

use crate::auth::{validate_jwt, Claims, ADMIN_ROLE};
use crate::error::ApiError;

/// Authenticated admin context extracted from the bearer JWT
#[derive(Clone, Debug)]
pub struct AuthAdmin {
    pub username: String,
    pub role: String,
}

impl From<Claims> for AuthAdmin {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.sub,
            role: claims.role,
        }
    }
}

/// JWT middleware guarding admin-only routes. Validates the token and
/// requires the Admin role claim.
pub async fn require_admin(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, impl IntoResponse> {
    let token = extract_jwt_from_headers(&headers).map_err(|msg| reject(ApiError::unauthorized(msg)))?;

    let claims = validate_jwt(&token).map_err(|msg| reject(ApiError::unauthorized(msg)))?;

    if claims.role != ADMIN_ROLE {
        return Err(reject(ApiError::forbidden("Admin role required")));
    }

    let admin = AuthAdmin::from(claims);
    request.extensions_mut().insert(admin);

    Ok(next.run(request).await)
}

fn reject(api_error: ApiError) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::from_u16(api_error.status_code()).unwrap_or(StatusCode::UNAUTHORIZED),
        Json(api_error.to_json()),
    )
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
