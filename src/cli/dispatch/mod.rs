//! Command-line argument dispatch and server initialization.
//!
//! This module maps validated CLI arguments to the appropriate action, such
//! as starting the API server with its full configuration state.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::auth;
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    let auth_opts = auth::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        frontend_base_url: auth_opts.frontend_base_url,
        session_ttl_seconds: auth_opts.session_ttl_seconds,
        remember_session_ttl_seconds: auth_opts.remember_session_ttl_seconds,
        google_client_id: auth_opts.google_client_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::actions::Action;
    use crate::cli::commands;

    #[test]
    fn handler_builds_server_action() {
        temp_env::with_vars(
            [
                ("ENSALUTI_PORT", None::<&str>),
                ("ENSALUTI_GOOGLE_CLIENT_ID", Some("client-id")),
            ],
            || {
                let matches = commands::new().get_matches_from(vec![
                    "ensaluti",
                    "--dsn",
                    "postgres://user@localhost:5432/ensaluti",
                ]);
                let action = handler(&matches).expect("action");
                let Action::Server(args) = action;
                assert_eq!(args.port, 8080);
                assert_eq!(args.dsn, "postgres://user@localhost:5432/ensaluti");
                assert_eq!(args.google_client_id.as_deref(), Some("client-id"));
            },
        );
    }
}
