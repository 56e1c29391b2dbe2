use anyhow::{Context, Result};
use clap::{Arg, Command};

pub const ARG_FRONTEND_BASE_URL: &str = "frontend-base-url";
pub const ARG_SESSION_TTL_SECONDS: &str = "session-ttl-seconds";
pub const ARG_REMEMBER_SESSION_TTL_SECONDS: &str = "remember-session-ttl-seconds";
pub const ARG_GOOGLE_CLIENT_ID: &str = "google-client-id";

/// Parsed auth-related options.
#[derive(Debug)]
pub struct Options {
    pub frontend_base_url: String,
    pub session_ttl_seconds: i64,
    pub remember_session_ttl_seconds: i64,
    pub google_client_id: Option<String>,
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_FRONTEND_BASE_URL)
                .long(ARG_FRONTEND_BASE_URL)
                .help("Base URL of the frontend, used for CORS and cookie policy")
                .default_value("http://localhost:3000")
                .env("ENSALUTI_FRONTEND_BASE_URL"),
        )
        .arg(
            Arg::new(ARG_SESSION_TTL_SECONDS)
                .long(ARG_SESSION_TTL_SECONDS)
                .help("Session lifetime in seconds for plain logins")
                .default_value("86400")
                .env("ENSALUTI_SESSION_TTL_SECONDS")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_REMEMBER_SESSION_TTL_SECONDS)
                .long(ARG_REMEMBER_SESSION_TTL_SECONDS)
                .help("Session lifetime in seconds for remember-me and Google logins")
                .default_value("2592000")
                .env("ENSALUTI_REMEMBER_SESSION_TTL_SECONDS")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_GOOGLE_CLIENT_ID)
                .long(ARG_GOOGLE_CLIENT_ID)
                .help("Google OAuth client id; Google sign-in is disabled when unset")
                .env("ENSALUTI_GOOGLE_CLIENT_ID"),
        )
}

impl Options {
    /// Extract auth options from parsed matches.
    ///
    /// # Errors
    /// Returns an error if a defaulted argument is somehow missing.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let frontend_base_url = matches
            .get_one::<String>(ARG_FRONTEND_BASE_URL)
            .cloned()
            .context("missing frontend base URL")?;
        let session_ttl_seconds = matches
            .get_one::<i64>(ARG_SESSION_TTL_SECONDS)
            .copied()
            .context("missing session TTL")?;
        let remember_session_ttl_seconds = matches
            .get_one::<i64>(ARG_REMEMBER_SESSION_TTL_SECONDS)
            .copied()
            .context("missing remember-me session TTL")?;
        let google_client_id = matches.get_one::<String>(ARG_GOOGLE_CLIENT_ID).cloned();

        Ok(Self {
            frontend_base_url,
            session_ttl_seconds,
            remember_session_ttl_seconds,
            google_client_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> Command {
        with_args(Command::new("ensaluti"))
    }

    #[test]
    fn defaults_apply() {
        temp_env::with_vars(
            [
                ("ENSALUTI_FRONTEND_BASE_URL", None::<&str>),
                ("ENSALUTI_SESSION_TTL_SECONDS", None),
                ("ENSALUTI_REMEMBER_SESSION_TTL_SECONDS", None),
                ("ENSALUTI_GOOGLE_CLIENT_ID", None),
            ],
            || {
                let matches = command().get_matches_from(vec!["ensaluti"]);
                let options = Options::parse(&matches).expect("options");
                assert_eq!(options.frontend_base_url, "http://localhost:3000");
                assert_eq!(options.session_ttl_seconds, 86_400);
                assert_eq!(options.remember_session_ttl_seconds, 2_592_000);
                assert_eq!(options.google_client_id, None);
            },
        );
    }

    #[test]
    fn overrides_apply() {
        let matches = command().get_matches_from(vec![
            "ensaluti",
            "--frontend-base-url",
            "https://app.example.com",
            "--session-ttl-seconds",
            "60",
            "--remember-session-ttl-seconds",
            "120",
            "--google-client-id",
            "client-id.apps.googleusercontent.com",
        ]);
        let options = Options::parse(&matches).expect("options");
        assert_eq!(options.frontend_base_url, "https://app.example.com");
        assert_eq!(options.session_ttl_seconds, 60);
        assert_eq!(options.remember_session_ttl_seconds, 120);
        assert_eq!(
            options.google_client_id.as_deref(),
            Some("client-id.apps.googleusercontent.com")
        );
    }
}
