//! Item read and mutation endpoints.
//!
//! Reads are public. Mutations require a connected session, and editing or
//! deleting is limited to the item's owner.

use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use super::super::auth::{require_connected, AuthState};
use super::storage;
use super::types::{ItemMutationResponse, ItemPayload, ItemResponse, ItemsResponse, MessageResponse};

#[utoipa::path(
    get,
    path = "/api/v1/items",
    responses(
        (status = 200, description = "Every item in the catalog.", body = ItemsResponse)
    ),
    tag = "catalog"
)]
/// Lists all items across categories.
pub async fn list_items(pool: Extension<PgPool>) -> impl IntoResponse {
    match storage::all_items(&pool).await {
        Ok(items) => (StatusCode::OK, Json(ItemsResponse { items })).into_response(),
        Err(err) => {
            error!("Failed to list items: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/items/{id}",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "The item.", body = ItemResponse),
        (status = 404, description = "Unknown item id.")
    ),
    tag = "catalog"
)]
/// Fetches a single item.
pub async fn get_item(Path(id): Path<i64>, pool: Extension<PgPool>) -> impl IntoResponse {
    match storage::item_by_id(&pool, id).await {
        Ok(Some(item)) => (StatusCode::OK, Json(ItemResponse { item })).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, Json(json!("Item not found"))).into_response(),
        Err(err) => {
            error!("Failed to fetch item {id}: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/categories/{id}/items",
    params(("id" = i64, Path, description = "Category id")),
    request_body = ItemPayload,
    responses(
        (status = 201, description = "Item created.", body = ItemMutationResponse),
        (status = 400, description = "Missing item name."),
        (status = 401, description = "Not signed in."),
        (status = 404, description = "Unknown category id.")
    ),
    tag = "catalog"
)]
/// Adds an item to a category, owned by the signed-in user.
pub async fn create_item(
    Path(category_id): Path<i64>,
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
    pool: Extension<PgPool>,
    Json(payload): Json<ItemPayload>,
) -> impl IntoResponse {
    let user = match require_connected(&headers, &auth_state).await {
        Ok(user) => user,
        Err(rejection) => return rejection,
    };

    let name = payload.name.trim();
    if name.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!("Item name is required."))).into_response();
    }

    match storage::category_exists(&pool, category_id).await {
        Ok(true) => {}
        Ok(false) => {
            return (StatusCode::NOT_FOUND, Json(json!("Category not found"))).into_response();
        }
        Err(err) => {
            error!("Failed to check category {category_id}: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    match storage::insert_item(
        &pool,
        category_id,
        user.user_id,
        name,
        payload.description.as_deref(),
    )
    .await
    {
        Ok(item) => (
            StatusCode::CREATED,
            Json(ItemMutationResponse {
                message: "Item successfully added".to_string(),
                item,
            }),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to insert item: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/items/{id}",
    params(("id" = i64, Path, description = "Item id")),
    request_body = ItemPayload,
    responses(
        (status = 200, description = "Item updated.", body = ItemMutationResponse),
        (status = 400, description = "Missing item name."),
        (status = 401, description = "Not signed in."),
        (status = 403, description = "The item belongs to another user."),
        (status = 404, description = "Unknown item id.")
    ),
    tag = "catalog"
)]
/// Edits an item. Only the owner may edit.
pub async fn update_item(
    Path(id): Path<i64>,
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
    pool: Extension<PgPool>,
    Json(payload): Json<ItemPayload>,
) -> impl IntoResponse {
    let user = match require_connected(&headers, &auth_state).await {
        Ok(user) => user,
        Err(rejection) => return rejection,
    };

    let item = match storage::item_by_id(&pool, id).await {
        Ok(Some(item)) => item,
        Ok(None) => {
            return (StatusCode::NOT_FOUND, Json(json!("Item not found"))).into_response();
        }
        Err(err) => {
            error!("Failed to fetch item {id}: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    if item.userid != Some(user.user_id) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!("You cannot edit items that belong to another user")),
        )
            .into_response();
    }

    let name = payload.name.trim();
    if name.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!("Item name is required."))).into_response();
    }

    match storage::update_item(&pool, id, name, payload.description.as_deref()).await {
        Ok(item) => (
            StatusCode::OK,
            Json(ItemMutationResponse {
                message: "Item successfully updated".to_string(),
                item,
            }),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to update item {id}: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/items/{id}",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item deleted.", body = MessageResponse),
        (status = 401, description = "Not signed in."),
        (status = 403, description = "The item belongs to another user."),
        (status = 404, description = "Unknown item id.")
    ),
    tag = "catalog"
)]
/// Deletes an item. Only the owner may delete.
pub async fn delete_item(
    Path(id): Path<i64>,
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
    pool: Extension<PgPool>,
) -> impl IntoResponse {
    let user = match require_connected(&headers, &auth_state).await {
        Ok(user) => user,
        Err(rejection) => return rejection,
    };

    let item = match storage::item_by_id(&pool, id).await {
        Ok(Some(item)) => item,
        Ok(None) => {
            return (StatusCode::NOT_FOUND, Json(json!("Item not found"))).into_response();
        }
        Err(err) => {
            error!("Failed to fetch item {id}: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    if item.userid != Some(user.user_id) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!("You cannot delete items that belong to another user")),
        )
            .into_response();
    }

    match storage::delete_item(&pool, id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Item successfully deleted".to_string(),
            }),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to delete item {id}: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
