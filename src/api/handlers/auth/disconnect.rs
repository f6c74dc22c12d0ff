//! Token revocation and sign-out.
//!
//! Disconnect is deliberately not idempotent: only a connected session may
//! revoke, and the local identity is dropped only after the provider confirms
//! the revocation. A second call reports that nobody is connected.

use axum::{
    body::Bytes,
    extract::{Extension, Query},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{error, info};

use super::{
    csrf,
    error::DisconnectError,
    session::establish_session,
    state::{AuthState, SessionAuth},
    types::{AuthResponse, StateQuery},
    utils,
};

#[utoipa::path(
    post,
    path = "/auth/disconnect",
    request_body(
        content = String,
        description = "Optional form body carrying the anti-forgery state token.",
        content_type = "application/x-www-form-urlencoded"
    ),
    params(("state" = Option<String>, Query, description = "Anti-forgery state token")),
    responses(
        (status = 200, description = "Token revoked and session cleared.", body = AuthResponse),
        (status = 400, description = "Mismatched state token, or the provider refused the revocation."),
        (status = 401, description = "No account is connected to this session.")
    ),
    tag = "auth"
)]
/// Disconnects the caller's session from its provider account.
/// The state token may ride the query string or a form body. The session
/// keeps its identity when the provider refuses to revoke the token.
pub async fn disconnect(
    headers: HeaderMap,
    Query(query): Query<StateQuery>,
    auth_state: Extension<Arc<AuthState>>,
    body: Bytes,
) -> Response {
    let (session_id, response_headers) = establish_session(&auth_state, &headers).await;
    let expected = auth_state.sessions().ensure_state(session_id).await;

    let provided = utils::state_param(query.state, &headers, &body);
    if let Err(rejection) = csrf::validate_state(Some(expected.as_str()), provided.as_deref()) {
        return (response_headers, rejection).into_response();
    }

    let SessionAuth::Connected(current) = auth_state.sessions().auth(session_id).await else {
        return (response_headers, DisconnectError::NotConnected).into_response();
    };

    let revoked = auth_state
        .provider()
        .revoke(&current.access_token)
        .await
        .unwrap_or_else(|err| {
            error!("Failed to reach revocation endpoint: {err}");
            false
        });

    if !revoked {
        // The session stays connected: local state must not claim a sign-out
        // the provider did not perform.
        return (response_headers, DisconnectError::Revocation).into_response();
    }

    auth_state.sessions().disconnect(session_id).await;

    info!("User {} disconnected", current.user_id);

    let response = AuthResponse {
        message: "Logout Success".to_string(),
        flash: Some("You have successfully logged out".to_string()),
    };

    (response_headers, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Provider;
    use anyhow::Result;
    use axum::{
        body::{to_bytes, Body},
        http::{
            header::{CONTENT_TYPE, COOKIE},
            Request, StatusCode,
        },
        routing::post,
        Router,
    };
    use secrecy::SecretString;
    use serde_json::{json, Value};
    use std::net::TcpListener;
    use tower::ServiceExt;
    use uuid::Uuid;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::super::state::{AuthConfig, ConnectedUser};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn auth_state(server: &MockServer) -> Result<Arc<AuthState>> {
        let provider = Provider::new(
            "client-id.apps.example.com".to_string(),
            SecretString::from("client-secret"),
        )?
        .with_revoke_url(format!("{}/revoke", server.uri()));

        Ok(Arc::new(AuthState::new(AuthConfig::new(), provider)))
    }

    fn app(auth_state: Arc<AuthState>) -> Router {
        Router::new()
            .route("/auth/disconnect", post(disconnect))
            .layer(Extension(auth_state))
    }

    async fn seeded_session(auth_state: &AuthState) -> (Uuid, String, String) {
        let (session_id, _) = auth_state.sessions().ensure(None).await;
        let state = auth_state.sessions().ensure_state(session_id).await;
        let cookie = format!("katalogo_session={session_id}");
        (session_id, state, cookie)
    }

    async fn connect_session(auth_state: &AuthState, session_id: Uuid) {
        auth_state
            .sessions()
            .connect(
                session_id,
                ConnectedUser {
                    access_token: "token-123".to_string(),
                    subject_id: "subject-1".to_string(),
                    user_id: 7,
                    display_name: "Ada Lovelace".to_string(),
                    email: "ada@example.com".to_string(),
                },
            )
            .await;
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_disconnect_requires_connected_session() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/revoke"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let auth_state = auth_state(&server)?;
        let (_, state, cookie) = seeded_session(&auth_state).await;

        let request = Request::builder()
            .method("POST")
            .uri(format!("/auth/disconnect?state={state}"))
            .header(COOKIE, &cookie)
            .body(Body::empty())?;
        let response = app(auth_state).oneshot(request).await?;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await, json!("Current user not connected."));
        Ok(())
    }

    #[tokio::test]
    async fn test_disconnect_clears_session_on_success() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/revoke"))
            .and(query_param("token", "token-123"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let auth_state = auth_state(&server)?;
        let (session_id, state, cookie) = seeded_session(&auth_state).await;
        connect_session(&auth_state, session_id).await;

        let request = Request::builder()
            .method("POST")
            .uri(format!("/auth/disconnect?state={state}"))
            .header(COOKIE, &cookie)
            .body(Body::empty())?;
        let response = app(auth_state.clone()).oneshot(request).await?;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "message": "Logout Success",
                "flash": "You have successfully logged out"
            })
        );
        assert_eq!(
            auth_state.sessions().auth(session_id).await,
            SessionAuth::Disconnected
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_disconnect_keeps_session_when_revocation_fails() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/revoke"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let auth_state = auth_state(&server)?;
        let (session_id, state, cookie) = seeded_session(&auth_state).await;
        connect_session(&auth_state, session_id).await;

        let request = Request::builder()
            .method("POST")
            .uri(format!("/auth/disconnect?state={state}"))
            .header(COOKIE, &cookie)
            .body(Body::empty())?;
        let response = app(auth_state.clone()).oneshot(request).await?;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!("Failed to revoke token for given user.")
        );

        // Still connected, so the caller can retry.
        let SessionAuth::Connected(user) = auth_state.sessions().auth(session_id).await else {
            panic!("expected a connected session");
        };
        assert_eq!(user.user_id, 7);
        Ok(())
    }

    #[tokio::test]
    async fn test_disconnect_rejects_state_mismatch() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/revoke"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let auth_state = auth_state(&server)?;
        let (session_id, _, cookie) = seeded_session(&auth_state).await;
        connect_session(&auth_state, session_id).await;

        let request = Request::builder()
            .method("POST")
            .uri("/auth/disconnect?state=WRONGTOKEN")
            .header(COOKIE, &cookie)
            .body(Body::empty())?;
        let response = app(auth_state.clone()).oneshot(request).await?;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!("Invalid state parameter."));
        assert!(matches!(
            auth_state.sessions().auth(session_id).await,
            SessionAuth::Connected(_)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_disconnect_accepts_state_from_form_body() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/revoke"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let auth_state = auth_state(&server)?;
        let (session_id, state, cookie) = seeded_session(&auth_state).await;
        connect_session(&auth_state, session_id).await;

        let request = Request::builder()
            .method("POST")
            .uri("/auth/disconnect")
            .header(COOKIE, &cookie)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("state={state}")))?;
        let response = app(auth_state.clone()).oneshot(request).await?;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            auth_state.sessions().auth(session_id).await,
            SessionAuth::Disconnected
        );
        Ok(())
    }
}
