//! Session cookie plumbing and the session info endpoint.
//!
//! Sessions are identified by an opaque `HttpOnly` cookie. Handlers that
//! mutate auth state call [`establish_session`] so a first contact mints the
//! cookie; read-only catalog handlers use [`require_connected`] and never
//! create sessions.

use axum::{
    extract::Extension,
    http::{
        header::{InvalidHeaderValue, COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use super::state::{AuthConfig, AuthState, ConnectedUser, SessionAuth};
use super::types::SessionInfo;

pub(crate) const SESSION_COOKIE_NAME: &str = "katalogo_session";

/// Build the cookie that carries the session id.
pub(super) fn session_cookie(
    config: &AuthConfig,
    session_id: Uuid,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let max_age = config.session_ttl_seconds();
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={session_id}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}"
    );
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }

    HeaderValue::from_str(&cookie)
}

/// Read the session id from the request's `Cookie` header.
pub(crate) fn extract_session_id(headers: &HeaderMap) -> Option<Uuid> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;

    for pair in value.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == SESSION_COOKIE_NAME {
            return Uuid::parse_str(val).ok();
        }
    }

    None
}

/// Resolve the request's session, minting one (and the `Set-Cookie` header
/// the response must carry) when none is presented.
pub(super) async fn establish_session(
    auth_state: &AuthState,
    headers: &HeaderMap,
) -> (Uuid, HeaderMap) {
    let presented = extract_session_id(headers);
    let (session_id, created) = auth_state.sessions().ensure(presented).await;

    let mut response_headers = HeaderMap::new();
    if created {
        if let Ok(cookie) = session_cookie(auth_state.config(), session_id) {
            response_headers.insert(SET_COOKIE, cookie);
        }
    }

    (session_id, response_headers)
}

/// Resolve the session cookie into a connected user, or produce the `401`
/// the catalog handlers return for anonymous requests.
pub async fn require_connected(
    headers: &HeaderMap,
    auth_state: &AuthState,
) -> Result<ConnectedUser, Response> {
    let Some(session_id) = extract_session_id(headers) else {
        return Err(not_logged_in());
    };

    match auth_state.sessions().auth(session_id).await {
        SessionAuth::Connected(user) => Ok(user),
        SessionAuth::Disconnected => Err(not_logged_in()),
    }
}

fn not_logged_in() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!("You are not logged in"))).into_response()
}

#[utoipa::path(
    get,
    path = "/auth/session",
    responses(
        (status = 200, description = "Session state token and connection status.", body = SessionInfo)
    ),
    tag = "auth"
)]
/// Returns the caller's session snapshot, creating the session on first
/// contact. The state token in the response is what connect and disconnect
/// expect to be echoed back.
pub async fn session(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    let (session_id, response_headers) = establish_session(&auth_state, &headers).await;
    let state = auth_state.sessions().ensure_state(session_id).await;

    let info = match auth_state.sessions().auth(session_id).await {
        SessionAuth::Connected(user) => SessionInfo {
            state,
            connected: true,
            display_name: Some(user.display_name),
            email: Some(user.email),
        },
        SessionAuth::Disconnected => SessionInfo {
            state,
            connected: false,
            display_name: None,
            email: None,
        },
    };

    (response_headers, Json(info))
}
