//! Wire types for the catalog endpoints.
//!
//! Field spellings (`userid`, the capitalized wrapper keys) are part of the
//! public API contract and must not change.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemJson {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Owning user id.
    pub userid: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryJson {
    pub id: i64,
    pub name: String,
    pub items: Vec<ItemJson>,
    /// Owning user id.
    pub userid: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoriesResponse {
    #[serde(rename = "Categories")]
    pub categories: Vec<CategoryJson>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    #[serde(rename = "Category")]
    pub category: CategoryJson,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ItemsResponse {
    #[serde(rename = "Items")]
    pub items: Vec<ItemJson>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ItemResponse {
    #[serde(rename = "Item")]
    pub item: ItemJson,
}

/// Payload for creating or editing an item.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ItemPayload {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Outcome of a mutation plus the affected item.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ItemMutationResponse {
    pub message: String,
    #[serde(rename = "Item")]
    pub item: ItemJson,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
