//! Category read endpoints.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use sqlx::PgPool;
use tracing::error;

use super::storage;
use super::types::{CategoriesResponse, CategoryResponse};

#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses(
        (status = 200, description = "All categories that contain items.", body = CategoriesResponse)
    ),
    tag = "catalog"
)]
/// Lists categories with their items. A category with no items is omitted.
pub async fn list_categories(pool: Extension<PgPool>) -> impl IntoResponse {
    match storage::categories_with_items(&pool).await {
        Ok(categories) => {
            (StatusCode::OK, Json(CategoriesResponse { categories })).into_response()
        }
        Err(err) => {
            error!("Failed to list categories: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "The category and its items.", body = CategoryResponse),
        (status = 404, description = "Unknown category id.")
    ),
    tag = "catalog"
)]
/// Fetches a single category with its items.
pub async fn get_category(Path(id): Path<i64>, pool: Extension<PgPool>) -> impl IntoResponse {
    match storage::category_with_items(&pool, id).await {
        Ok(Some(category)) => (StatusCode::OK, Json(CategoryResponse { category })).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, Json(json!("Category not found"))).into_response(),
        Err(err) => {
            error!("Failed to fetch category {id}: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
