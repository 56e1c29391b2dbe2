//! Login endpoint.

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use super::{
    AuthState,
    password::verify_password_blocking,
    session::{issue_session, session_headers},
    storage::find_user_by_username,
    types::{ErrorResponse, LoginRequest, LoginResponse, UserProjection},
    utils::internal_error,
};

/// Single constructor for the unified 401 so the unknown-user and
/// wrong-password paths stay byte-identical.
fn invalid_credentials() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::new("Invalid username or password")),
    )
        .into_response()
}

#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Missing payload", body = String),
        (status = 401, description = "Invalid username or password", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let request: LoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let user = match find_user_by_username(&pool, &request.username).await {
        Ok(user) => user,
        Err(err) => {
            error!("Login lookup failed: {err}");
            return internal_error();
        }
    };

    // Unknown usernames fall through to the same response as bad passwords.
    let Some(user) = user else {
        return invalid_credentials();
    };

    let verified =
        match verify_password_blocking(user.password_hash.clone(), request.password).await {
            Ok(verified) => verified,
            Err(err) => {
                error!("Password verification failed: {err}");
                return internal_error();
            }
        };

    if !verified {
        return invalid_credentials();
    }

    let ttl_seconds = auth_state.config().session_ttl_for(request.remember_me);
    let issued = match issue_session(&pool, user.id, ttl_seconds).await {
        Ok(issued) => issued,
        Err(err) => {
            error!("Failed to create session: {err}");
            return internal_error();
        }
    };

    let response_headers = session_headers(auth_state.config(), &issued.session_id, ttl_seconds);
    let response = LoginResponse {
        success: true,
        session_id: issued.session_id,
        user: UserProjection {
            id: user.id.to_string(),
            username: user.username,
        },
    };

    (StatusCode::OK, response_headers, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::AuthConfig;
    use anyhow::Result;
    use axum::body::to_bytes;
    use sqlx::postgres::PgPoolOptions;

    fn auth_state() -> Arc<AuthState> {
        Arc::new(AuthState::new(AuthConfig::new(
            "http://localhost:3000".to_string(),
        )))
    }

    #[tokio::test]
    async fn login_missing_payload() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let response = login(Extension(pool), Extension(auth_state()), None)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_credentials_body_is_fixed() -> Result<()> {
        let response = invalid_credentials();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let bytes = to_bytes(response.into_body(), 1024).await?;
        assert_eq!(&bytes[..], br#"{"error":"Invalid username or password"}"#);
        Ok(())
    }
}
