use axum::extract::Extension;
use axum::Json;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::digest_password;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::User;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// POST /auth/signup - Create a new user account
///
/// Returns 409 when the email is already registered.
pub async fn signup(
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<SignupRequest>,
) -> ApiResult<User> {
    validate_signup(&payload)?;

    let digest = digest_password(&payload.password);
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (id, name, email, password_digest, created_at) \
         VALUES ($1, $2, $3, $4, now()) \
         RETURNING id, name, email, password_digest, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(payload.name.trim())
    .bind(payload.email.trim().to_ascii_lowercase())
    .bind(digest)
    .fetch_one(&pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            ApiError::conflict("Email already registered")
        }
        _ => ApiError::from(DatabaseError::Sqlx(e)),
    })?;

    Ok(ApiResponse::created("Account created", user))
}

fn validate_signup(payload: &SignupRequest) -> Result<(), ApiError> {
    let mut messages = Vec::new();

    if payload.name.trim().is_empty() {
        messages.push("name must not be empty");
    }
    let email = payload.email.trim();
    if email.is_empty() || !email.contains('@') {
        messages.push("email must be a valid address");
    }
    if payload.password.len() < 8 {
        messages.push("password must be at least 8 characters");
    }

    if messages.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error(messages.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_fields_together() {
        let err = validate_signup(&SignupRequest {
            name: " ".into(),
            email: "not-an-email".into(),
            password: "short".into(),
        })
        .unwrap_err();
        let msg = err.message().to_string();
        assert!(msg.contains("name"));
        assert!(msg.contains("email"));
        assert!(msg.contains("password"));
        assert_eq!(msg.lines().count(), 3);
    }

    #[test]
    fn accepts_valid_signup() {
        assert!(validate_signup(&SignupRequest {
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password: "correct horse".into(),
        })
        .is_ok());
    }
}
