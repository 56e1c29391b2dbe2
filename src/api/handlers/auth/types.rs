//! Request/response types for auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, rename = "fullName")]
    pub full_name: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterResponse {
    pub message: String,
}

/// Error body shared by all auth endpoints.
/// `details` only appears for password-policy violations, so the unified
/// invalid-credentials body stays byte-identical across failure causes.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(error: &str) -> Self {
        Self {
            error: error.to_string(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(error: &str, details: Vec<String>) -> Self {
        Self {
            error: error.to_string(),
            details: Some(details),
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "rememberMe")]
    pub remember_me: bool,
}

/// Minimal user projection returned to clients; never includes the hash.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone)]
pub struct UserProjection {
    pub id: String,
    pub username: String,
}

/// Response shape shared by login and Google sign-in so the client guard sees
/// one evidence format regardless of login method.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub user: UserProjection,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct GoogleSignInRequest {
    pub credential: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SessionStatusResponse {
    pub user: UserProjection,
    #[serde(rename = "expiresAt")]
    pub expires_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    #[test]
    fn register_request_accepts_partial_bodies() -> Result<()> {
        let decoded: RegisterRequest = serde_json::from_str(r#"{"username":"alice1234"}"#)?;
        assert_eq!(decoded.username.as_deref(), Some("alice1234"));
        assert_eq!(decoded.password, None);
        assert_eq!(decoded.full_name, None);
        Ok(())
    }

    #[test]
    fn error_response_omits_absent_details() -> Result<()> {
        let body = serde_json::to_string(&ErrorResponse::new("Invalid username or password"))?;
        assert_eq!(body, r#"{"error":"Invalid username or password"}"#);
        Ok(())
    }

    #[test]
    fn error_response_carries_details() -> Result<()> {
        let response = ErrorResponse::with_details(
            "Password does not meet security requirements",
            vec!["Password must be at least 8 characters long".to_string()],
        );
        let value = serde_json::to_value(&response)?;
        let details = value
            .get("details")
            .and_then(serde_json::Value::as_array)
            .context("missing details")?;
        assert_eq!(details.len(), 1);
        Ok(())
    }

    #[test]
    fn login_request_defaults_remember_me() -> Result<()> {
        let decoded: LoginRequest =
            serde_json::from_str(r#"{"username":"alice1234","password":"Abcdef1!"}"#)?;
        assert!(!decoded.remember_me);

        let decoded: LoginRequest = serde_json::from_str(
            r#"{"username":"alice1234","password":"Abcdef1!","rememberMe":true}"#,
        )?;
        assert!(decoded.remember_me);
        Ok(())
    }

    #[test]
    fn login_response_uses_camel_case_session_id() -> Result<()> {
        let response = LoginResponse {
            success: true,
            session_id: "token".to_string(),
            user: UserProjection {
                id: "id".to_string(),
                username: "alice1234".to_string(),
            },
        };
        let value = serde_json::to_value(&response)?;
        assert!(value.get("sessionId").is_some());
        assert!(value.get("session_id").is_none());
        Ok(())
    }
}
