//! # Ensaluti (Sign-in & Session Service)
//!
//! `ensaluti` is a small authentication service for web applications:
//! username/password registration and login, Google sign-in, and opaque-token
//! sessions shared by both flows.
//!
//! ## Sessions
//!
//! Local login and Google sign-in mint the same kind of session record: an
//! opaque 256-bit token whose SHA-256 hash is stored with an absolute expiry.
//! The raw token only ever travels to the client, which keeps it as evidence
//! alongside a minimal `{id, username}` projection of the user.
//!
//! - **One issuance path:** every session is created by the session issuer in
//!   `api::handlers::auth::session`, so token strength and expiry policy stay
//!   uniform across login methods.
//! - **Expiry is the only deactivation:** logout clears client-held state;
//!   session rows are left to lapse.
//!
//! ## Google sign-in
//!
//! Google ID tokens are verified offline against Google's JWKS and reconciled
//! into the local user table (keyed by email), so everything downstream
//! reasons about a single user/session model regardless of how the login
//! happened.
//!
//! ## Client guard
//!
//! The [`guard`] module is the client-side counterpart: durable/volatile
//! evidence stores and the tri-state mount machine that decides whether a
//! protected view renders, shows a loading state, or redirects to sign-in.

pub mod api;
pub mod cli;
pub mod guard;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
