use crate::api;
use crate::api::handlers::auth::AuthConfig;
use anyhow::Result;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub frontend_base_url: String,
    pub session_ttl_seconds: i64,
    pub remember_session_ttl_seconds: i64,
    pub google_client_id: Option<String>,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let mut auth_config = AuthConfig::new(args.frontend_base_url)
        .with_session_ttl_seconds(args.session_ttl_seconds)
        .with_remember_session_ttl_seconds(args.remember_session_ttl_seconds);

    if let Some(client_id) = args.google_client_id {
        auth_config = auth_config.with_google_client_id(client_id);
    }

    api::new(args.port, args.dsn, auth_config).await
}
