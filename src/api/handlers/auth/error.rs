//! Failure taxonomy for the sign-in flows.
//!
//! Every variant is terminal: it is rendered as a status plus JSON message at
//! the point of failure and nothing propagates past the handler.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Ways the connect flow can fail after the state check has passed.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("Failed to upgrade the authorization code.")]
    CodeExchange,
    /// The introspection endpoint reported an error for the access token.
    /// The provider's own message is passed through.
    #[error("{0}")]
    Introspection(String),
    #[error("Token's user ID doesn't match given user ID.")]
    SubjectMismatch,
    #[error("Token's client ID does not match app's.")]
    AudienceMismatch,
    #[error("Failed to fetch the user profile.")]
    ProfileFetch,
    #[error("Failed to resolve the local user.")]
    UserResolve,
}

impl ConnectError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::CodeExchange | Self::SubjectMismatch | Self::AudienceMismatch => {
                StatusCode::UNAUTHORIZED
            }
            Self::Introspection(_) | Self::ProfileFetch | Self::UserResolve => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ConnectError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!(self.to_string()))).into_response()
    }
}

/// Ways the disconnect flow can fail after the state check has passed.
#[derive(Debug, Error)]
pub enum DisconnectError {
    #[error("Current user not connected.")]
    NotConnected,
    #[error("Failed to revoke token for given user.")]
    Revocation,
}

impl DisconnectError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::NotConnected => StatusCode::UNAUTHORIZED,
            Self::Revocation => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for DisconnectError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_error_statuses() {
        assert_eq!(ConnectError::CodeExchange.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ConnectError::SubjectMismatch.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ConnectError::AudienceMismatch.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ConnectError::Introspection("bad token".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ConnectError::ProfileFetch.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ConnectError::UserResolve.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_connect_error_messages() {
        assert_eq!(
            ConnectError::CodeExchange.to_string(),
            "Failed to upgrade the authorization code."
        );
        assert_eq!(
            ConnectError::SubjectMismatch.to_string(),
            "Token's user ID doesn't match given user ID."
        );
        assert_eq!(
            ConnectError::AudienceMismatch.to_string(),
            "Token's client ID does not match app's."
        );
        assert_eq!(
            ConnectError::Introspection("expired".to_string()).to_string(),
            "expired"
        );
    }

    #[test]
    fn test_disconnect_error_statuses() {
        assert_eq!(
            DisconnectError::NotConnected.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(DisconnectError::Revocation.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_disconnect_error_messages() {
        assert_eq!(
            DisconnectError::NotConnected.to_string(),
            "Current user not connected."
        );
        assert_eq!(
            DisconnectError::Revocation.to_string(),
            "Failed to revoke token for given user."
        );
    }
}
