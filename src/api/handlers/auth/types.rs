//! Wire types for the auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Query-string carrier for the anti-forgery state token.
#[derive(Debug, Deserialize)]
pub struct StateQuery {
    pub state: Option<String>,
}

/// Outcome of a connect or disconnect call. `flash` carries the notice a UI
/// would surface to the person signing in.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<String>,
}

/// Snapshot of the caller's session: the state token to echo back on
/// connect/disconnect plus the current connection status.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionInfo {
    pub state: String,
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
