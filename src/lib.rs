//! # Katalogo (Sports Catalog API)
//!
//! `katalogo` serves a small sports-equipment catalog over JSON and lets users
//! sign in with a third-party identity provider instead of a local password.
//!
//! ## Sign-in flow
//!
//! The browser obtains a short-lived authorization code from the provider's
//! consent screen and posts it to `/auth/connect`. The server exchanges the
//! code, cross-checks the resulting access token against the provider's
//! introspection endpoint (subject and audience must match), fetches the
//! profile, and links or creates a local user keyed by email. `/auth/
//! disconnect` revokes the token and drops the identity from the session.
//!
//! ## CSRF protection
//!
//! Every session carries an opaque `state` token, minted on first contact and
//! returned by `GET /auth/session`. State-changing auth requests must echo it
//! back (query parameter or form field) or they are rejected before any
//! provider traffic happens.
//!
//! ## Catalog
//!
//! Categories and items are plain Postgres rows exposed under `/api/v1`.
//! Mutations require a connected session; editing or deleting an item is
//! restricted to its owner.

pub mod api;
pub mod cli;
pub mod provider;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
