//! Third-party sign-in: session handling, the anti-forgery state guard, and
//! the connect/disconnect flows against the identity provider.
//!
//! ## Sessions
//!
//! Sessions live in memory, keyed by an opaque `HttpOnly` cookie, and carry
//! two things: the per-session anti-forgery state token and the connected
//! identity. Identity is all-or-nothing; there is no representable state in
//! which only some of the token, subject, and user fields are present.
//!
//! ## State guard
//!
//! `GET /auth/session` hands the caller the state token. `POST /auth/connect`
//! and `POST /auth/disconnect` refuse to do anything, including talking to
//! the provider, until the caller echoes that token back.

pub(crate) mod connect;
pub(crate) mod disconnect;
pub(crate) mod session;
pub(crate) mod state;
pub(crate) mod types;

mod csrf;
mod error;
mod storage;
mod utils;

pub use connect::connect;
pub use disconnect::disconnect;
pub use session::{require_connected, session};
pub use state::{AuthConfig, AuthState, ConnectedUser, SessionAuth};
