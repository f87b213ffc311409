use axum::extract::Extension;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::PgPool;

use crate::auth::{generate_jwt, verify_password, Claims};
use crate::config;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::User;

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/signin - Authenticate and receive a JWT
///
/// Unknown email and wrong password produce the same 401 so the endpoint
/// does not confirm which accounts exist.
pub async fn signin(
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<SigninRequest>,
) -> ApiResult<Value> {
    let email = payload.email.trim().to_ascii_lowercase();

    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password_digest, created_at FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(&pool)
    .await
    .map_err(DatabaseError::from)?;

    let user = match user {
        Some(user) if verify_password(&payload.password, &user.password_digest) => user,
        _ => return Err(ApiError::unauthorized("Invalid email or password")),
    };

    let token = generate_jwt(Claims::new(user.id, user.email.clone()))?;
    let expires_in = config::config().security.jwt_expiry_hours * 3600;

    Ok(ApiResponse::success(
        "Signed in",
        json!({
            "token": token,
            "user": user,
            "expiresIn": expires_in,
        }),
    ))
}
