//! Auth configuration and shared handler state.

use super::google::GoogleVerifier;

const DEFAULT_SESSION_TTL_SECONDS: i64 = 24 * 60 * 60;
const DEFAULT_REMEMBER_SESSION_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;
const DEFAULT_GOOGLE_JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

#[derive(Clone, Debug)]
pub struct AuthConfig {
    frontend_base_url: String,
    session_ttl_seconds: i64,
    remember_session_ttl_seconds: i64,
    google_client_id: Option<String>,
    google_jwks_url: String,
}

impl AuthConfig {
    #[must_use]
    pub fn new(frontend_base_url: String) -> Self {
        Self {
            frontend_base_url,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            remember_session_ttl_seconds: DEFAULT_REMEMBER_SESSION_TTL_SECONDS,
            google_client_id: None,
            google_jwks_url: DEFAULT_GOOGLE_JWKS_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_remember_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.remember_session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_google_client_id(mut self, client_id: String) -> Self {
        self.google_client_id = Some(client_id);
        self
    }

    #[must_use]
    pub fn with_google_jwks_url(mut self, url: String) -> Self {
        self.google_jwks_url = url;
        self
    }

    pub(crate) fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    pub(super) fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    pub(super) fn remember_session_ttl_seconds(&self) -> i64 {
        self.remember_session_ttl_seconds
    }

    /// TTL policy for both authenticators: remember-me (and Google sign-in)
    /// gets the long lifetime, plain logins the short one.
    pub(super) fn session_ttl_for(&self, remember_me: bool) -> i64 {
        if remember_me {
            self.remember_session_ttl_seconds
        } else {
            self.session_ttl_seconds
        }
    }

    pub(super) fn google_client_id(&self) -> Option<&str> {
        self.google_client_id.as_deref()
    }

    pub(super) fn google_jwks_url(&self) -> &str {
        &self.google_jwks_url
    }

    pub(super) fn session_cookie_secure(&self) -> bool {
        self.frontend_base_url.starts_with("https://")
    }
}

pub struct AuthState {
    config: AuthConfig,
    google: Option<GoogleVerifier>,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        // Google sign-in stays disabled until a client id is configured.
        let google = config.google_client_id().map(|client_id| {
            GoogleVerifier::new(
                client_id.to_string(),
                config.google_jwks_url().to_string(),
            )
        });
        Self { config, google }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub(super) fn google(&self) -> Option<&GoogleVerifier> {
        self.google.as_ref()
    }
}
