//! Catalog endpoints: public category and item reads plus owner-scoped item
//! mutations.
//!
//! Flow Overview:
//! 1) Reads serve the category and item tree to anyone.
//! 2) Mutations resolve the session cookie to a connected user first.
//! 3) Edit and delete check ownership before touching the row.
//!
//! The handler modules parse inputs and map the flow; `storage` owns the SQL
//! and response shaping.

pub(crate) mod categories;
pub(crate) mod items;
pub(crate) mod types;

mod storage;

pub use categories::{get_category, list_categories};
pub use items::{create_item, delete_item, get_item, list_items, update_item};

#[cfg(test)]
mod tests;
