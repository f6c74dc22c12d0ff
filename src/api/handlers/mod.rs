//! HTTP handlers.

pub mod auth;
pub mod catalog;
pub mod health;

pub use self::health::health;
