//! Registration endpoint.

use axum::{
    Json,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use sqlx::PgPool;
use tracing::error;

use super::{
    password::{hash_password_blocking, validate_password},
    storage::{CreateUserOutcome, NewUser, insert_user},
    types::{ErrorResponse, RegisterRequest, RegisterResponse},
    utils::internal_error,
};

/// Credentials accepted from the query string.
///
/// This path puts secrets into URLs (and therefore access logs); it is part
/// of the public contract and kept as-is.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterQuery {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[utoipa::path(
    post,
    path = "/v1/auth/register",
    request_body = RegisterRequest,
    params(
        ("username" = Option<String>, Query, description = "Username (overrides the body)"),
        ("password" = Option<String>, Query, description = "Password (overrides the body)")
    ),
    responses(
        (status = 201, description = "User created", body = RegisterResponse),
        (status = 400, description = "Missing input or weak password", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    pool: Extension<PgPool>,
    Query(query): Query<RegisterQuery>,
    payload: Option<Json<RegisterRequest>>,
) -> impl IntoResponse {
    let body = payload.map(|Json(payload)| payload).unwrap_or_default();

    // Query parameters win over the body.
    let username = query.username.or(body.username).unwrap_or_default();
    let password = query.password.or(body.password).unwrap_or_default();

    if username.is_empty() || password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Username and password are required")),
        )
            .into_response();
    }

    // Every violated rule is reported, not just the first.
    let check = validate_password(&password);
    if !check.is_valid {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::with_details(
                "Password does not meet security requirements",
                check.errors,
            )),
        )
            .into_response();
    }

    let password_hash = match hash_password_blocking(password).await {
        Ok(hash) => hash,
        Err(err) => {
            error!("Failed to hash password: {err}");
            return internal_error();
        }
    };

    let new_user = NewUser {
        username: &username,
        password_hash: &password_hash,
        full_name: body.full_name.as_deref(),
        profile_picture: None,
        google_subject: None,
    };

    match insert_user(&pool, &new_user).await {
        Ok(CreateUserOutcome::Created(_)) => (
            StatusCode::CREATED,
            Json(RegisterResponse {
                message: "User created successfully".to_string(),
            }),
        )
            .into_response(),
        Ok(CreateUserOutcome::Conflict) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::new("Username already exists")),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to create user: {err}");
            internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use axum::response::IntoResponse;
    use sqlx::postgres::PgPoolOptions;

    fn lazy_pool() -> Result<PgPool> {
        Ok(PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?)
    }

    #[tokio::test]
    async fn register_missing_credentials() -> Result<()> {
        let response = register(Extension(lazy_pool()?), Query(RegisterQuery::default()), None)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn register_rejects_weak_password() -> Result<()> {
        // Policy runs before any database access, so a lazy pool is enough.
        let response = register(
            Extension(lazy_pool()?),
            Query(RegisterQuery::default()),
            Some(Json(RegisterRequest {
                username: Some("alice1234".to_string()),
                password: Some("weak".to_string()),
                full_name: None,
            })),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn register_accepts_query_credentials() -> Result<()> {
        // Weak query-string password proves the query path feeds validation.
        let response = register(
            Extension(lazy_pool()?),
            Query(RegisterQuery {
                username: Some("alice1234".to_string()),
                password: Some("weak".to_string()),
            }),
            None,
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }
}
