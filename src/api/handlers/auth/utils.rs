//! Small helpers shared by the auth handlers.

use axum::body::Bytes;
use axum::http::{header::CONTENT_TYPE, HeaderMap};
use regex::Regex;

/// Normalize an email for lookup/uniqueness checks.
pub(super) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
pub(super) fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

/// Pull the anti-forgery state from the query string, falling back to a
/// `state` field when the body is a form post. The query value wins.
pub(super) fn state_param(
    query_state: Option<String>,
    headers: &HeaderMap,
    body: &Bytes,
) -> Option<String> {
    if query_state.is_some() {
        return query_state;
    }

    let form_encoded = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));
    if !form_encoded {
        return None;
    }

    for (key, value) in url::form_urlencoded::parse(body) {
        if key == "state" {
            return Some(value.into_owned());
        }
    }

    None
}

pub(super) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}
