//! Database helpers for users and sessions.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::utils::{generate_session_token, hash_session_token, is_unique_violation};

/// Outcome when attempting to create a user.
#[derive(Debug)]
pub(super) enum CreateUserOutcome {
    Created(UserRecord),
    Conflict,
}

/// A stored user row. The hash stays inside the handlers and is never
/// serialized into a response.
#[derive(Debug, Clone)]
pub(super) struct UserRecord {
    pub(super) id: Uuid,
    pub(super) username: String,
    pub(super) password_hash: String,
}

/// Fields for a new user row.
pub(super) struct NewUser<'a> {
    pub(super) username: &'a str,
    pub(super) password_hash: &'a str,
    pub(super) full_name: Option<&'a str>,
    pub(super) profile_picture: Option<&'a str>,
    pub(super) google_subject: Option<&'a str>,
}

/// A freshly issued session: the raw token plus its absolute expiry.
pub(crate) struct IssuedSession {
    pub(crate) session_id: String,
    pub(crate) expires_at: DateTime<Utc>,
}

/// A stored session joined with its owner.
///
/// Expiry is NOT filtered here; callers interpret `expires_at`.
pub(crate) struct SessionRecord {
    pub(crate) user_id: Uuid,
    pub(crate) username: String,
    pub(crate) expires_at: DateTime<Utc>,
}

pub(super) async fn find_user_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<UserRecord>> {
    let query = "SELECT id, username, password_hash FROM users WHERE username = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(username)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup user")?;

    Ok(row.map(|row| UserRecord {
        id: row.get("id"),
        username: row.get("username"),
        password_hash: row.get("password_hash"),
    }))
}

/// Insert a user, relying on the unique constraint for username collisions.
///
/// Concurrent registrations of the same name race at the database, not in
/// application code; the loser observes `Conflict`.
pub(super) async fn insert_user(pool: &PgPool, user: &NewUser<'_>) -> Result<CreateUserOutcome> {
    let query = r"
        INSERT INTO users
            (username, password_hash, full_name, profile_picture, google_subject)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(user.username)
        .bind(user.password_hash)
        .bind(user.full_name)
        .bind(user.profile_picture)
        .bind(user.google_subject)
        .fetch_one(pool)
        .instrument(span)
        .await;

    match row {
        Ok(row) => Ok(CreateUserOutcome::Created(UserRecord {
            id: row.get("id"),
            username: user.username.to_string(),
            password_hash: user.password_hash.to_string(),
        })),
        Err(err) if is_unique_violation(&err) => Ok(CreateUserOutcome::Conflict),
        Err(err) => Err(err).context("failed to insert user"),
    }
}

pub(crate) async fn insert_session(
    pool: &PgPool,
    user_id: Uuid,
    ttl_seconds: i64,
) -> Result<IssuedSession> {
    // Generate a random token, store only its hash, and return the raw value
    // for the client. Expiry is computed at insert time.
    let query = r"
        INSERT INTO user_sessions (session_hash, user_id, expires_at)
        VALUES ($1, $2, NOW() + ($3 * INTERVAL '1 second'))
        RETURNING expires_at
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );

    for _ in 0..3 {
        let token = generate_session_token()?;
        let token_hash = hash_session_token(&token);
        let result = sqlx::query(query)
            .bind(token_hash)
            .bind(user_id)
            .bind(ttl_seconds)
            .fetch_one(pool)
            .instrument(span.clone())
            .await;

        match result {
            Ok(row) => {
                return Ok(IssuedSession {
                    session_id: token,
                    expires_at: row.get("expires_at"),
                });
            }
            Err(err) if is_unique_violation(&err) => {}
            Err(err) => return Err(err).context("failed to insert session"),
        }
    }

    Err(anyhow!("failed to generate unique session token"))
}

pub(crate) async fn lookup_session(
    pool: &PgPool,
    token_hash: &[u8],
) -> Result<Option<SessionRecord>> {
    // No expiry filter: callers decide what an expired record means.
    let query = r"
        SELECT users.id, users.username, user_sessions.expires_at
        FROM user_sessions
        JOIN users ON users.id = user_sessions.user_id
        WHERE user_sessions.session_hash = $1
        LIMIT 1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(token_hash)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup session")?;

    Ok(row.map(|row| SessionRecord {
        user_id: row.get("id"),
        username: row.get("username"),
        expires_at: row.get("expires_at"),
    }))
}

#[cfg(test)]
mod tests {
    use super::{CreateUserOutcome, SessionRecord, UserRecord};
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn create_user_outcome_debug_names() {
        let record = UserRecord {
            id: Uuid::nil(),
            username: "alice1234".to_string(),
            password_hash: "hash".to_string(),
        };
        assert!(format!("{:?}", CreateUserOutcome::Created(record)).starts_with("Created"));
        assert_eq!(format!("{:?}", CreateUserOutcome::Conflict), "Conflict");
    }

    #[test]
    fn session_record_holds_values() {
        let now = Utc::now();
        let record = SessionRecord {
            user_id: Uuid::nil(),
            username: "alice1234".to_string(),
            expires_at: now,
        };
        assert_eq!(record.user_id, Uuid::nil());
        assert_eq!(record.username, "alice1234");
        assert_eq!(record.expires_at, now);
    }
}
