//! Database access for local identity resolution.

use anyhow::{Context, Result};
use sqlx::{PgPool, Row};
use tracing::Instrument;

use super::utils::is_unique_violation;

/// Look up a user id by normalized email.
pub(crate) async fn find_user_id_by_email(pool: &PgPool, email: &str) -> Result<Option<i64>> {
    let query = "SELECT id FROM users WHERE email = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to look up user by email")?;

    Ok(row.map(|row| row.get("id")))
}

/// Create a user for a first-time sign-in.
///
/// Two requests racing on the same email are fine: the loser of the unique
/// constraint re-reads and returns the winner's id.
pub(crate) async fn create_user(pool: &PgPool, name: &str, email: &str) -> Result<i64> {
    let query = "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(name)
        .bind(email)
        .fetch_one(pool)
        .instrument(span)
        .await;

    match row {
        Ok(row) => Ok(row.get("id")),
        Err(err) => {
            if is_unique_violation(&err) {
                find_user_id_by_email(pool, email)
                    .await?
                    .context("user row missing after unique violation")
            } else {
                Err(err).context("failed to create user")
            }
        }
    }
}
