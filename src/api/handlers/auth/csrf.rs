//! Per-session anti-forgery state tokens.
//!
//! Every session gets a 32-character token on first contact with the auth
//! endpoints. State-changing requests must echo it back, and the comparison
//! happens before any session mutation or provider traffic.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rand::Rng;
use serde_json::json;

const STATE_TOKEN_LENGTH: usize = 32;
const STATE_TOKEN_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Mint a fresh state token: fixed length, URL-safe, unpredictable.
pub(super) fn generate_state_token() -> String {
    let mut rng = rand::thread_rng();

    (0..STATE_TOKEN_LENGTH)
        .map(|_| {
            let index = rng.gen_range(0..STATE_TOKEN_ALPHABET.len());
            STATE_TOKEN_ALPHABET[index] as char
        })
        .collect()
}

/// Compare the state echoed by the client against the session's token.
///
/// Fails closed: a token missing on either side rejects the request the same
/// way a mismatch does.
pub(super) fn validate_state(
    expected: Option<&str>,
    provided: Option<&str>,
) -> Result<(), Response> {
    match (expected, provided) {
        (Some(expected), Some(provided)) if expected == provided => Ok(()),
        _ => Err((
            StatusCode::BAD_REQUEST,
            Json(json!("Invalid state parameter.")),
        )
            .into_response()),
    }
}
