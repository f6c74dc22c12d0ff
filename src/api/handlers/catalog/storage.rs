//! Database access for the catalog.

use anyhow::{Context, Result};
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::Instrument;

use super::types::{CategoryJson, ItemJson};

fn item_from_row(row: &PgRow) -> ItemJson {
    ItemJson {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        userid: row.get("user_id"),
    }
}

/// Fetch every category that has at least one item, items included.
pub(super) async fn categories_with_items(pool: &PgPool) -> Result<Vec<CategoryJson>> {
    let query = "SELECT c.id, c.name, c.user_id, \
                 i.id AS item_id, i.name AS item_name, \
                 i.description AS item_description, i.user_id AS item_user_id \
                 FROM categories c \
                 JOIN items i ON i.cat_id = c.id \
                 ORDER BY c.id, i.id";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list categories")?;

    let mut categories: Vec<CategoryJson> = Vec::new();
    for row in rows {
        let category_id: i64 = row.get("id");
        if categories.last().map(|category| category.id) != Some(category_id) {
            categories.push(CategoryJson {
                id: category_id,
                name: row.get("name"),
                items: Vec::new(),
                userid: row.get("user_id"),
            });
        }
        if let Some(category) = categories.last_mut() {
            category.items.push(ItemJson {
                id: row.get("item_id"),
                name: row.get("item_name"),
                description: row.get("item_description"),
                userid: row.get("item_user_id"),
            });
        }
    }

    Ok(categories)
}

/// Fetch one category with its items, or `None` when the id is unknown.
pub(super) async fn category_with_items(pool: &PgPool, id: i64) -> Result<Option<CategoryJson>> {
    let query = "SELECT id, name, user_id FROM categories WHERE id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to fetch category")?;

    let Some(row) = row else {
        return Ok(None);
    };

    let items = items_in_category(pool, id).await?;

    Ok(Some(CategoryJson {
        id: row.get("id"),
        name: row.get("name"),
        items,
        userid: row.get("user_id"),
    }))
}

async fn items_in_category(pool: &PgPool, category_id: i64) -> Result<Vec<ItemJson>> {
    let query = "SELECT id, name, description, user_id FROM items WHERE cat_id = $1 ORDER BY id";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .bind(category_id)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list category items")?;

    Ok(rows.iter().map(item_from_row).collect())
}

pub(super) async fn all_items(pool: &PgPool) -> Result<Vec<ItemJson>> {
    let query = "SELECT id, name, description, user_id FROM items ORDER BY id";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list items")?;

    Ok(rows.iter().map(item_from_row).collect())
}

pub(super) async fn item_by_id(pool: &PgPool, id: i64) -> Result<Option<ItemJson>> {
    let query = "SELECT id, name, description, user_id FROM items WHERE id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to fetch item")?;

    Ok(row.as_ref().map(item_from_row))
}

pub(super) async fn category_exists(pool: &PgPool, id: i64) -> Result<bool> {
    let query = "SELECT id FROM categories WHERE id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to check category")?;

    Ok(row.is_some())
}

pub(super) async fn insert_item(
    pool: &PgPool,
    category_id: i64,
    user_id: i64,
    name: &str,
    description: Option<&str>,
) -> Result<ItemJson> {
    let query = "INSERT INTO items (name, description, cat_id, user_id) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING id, name, description, user_id";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(name)
        .bind(description)
        .bind(category_id)
        .bind(user_id)
        .fetch_one(pool)
        .instrument(span)
        .await
        .context("failed to insert item")?;

    Ok(item_from_row(&row))
}

pub(super) async fn update_item(
    pool: &PgPool,
    id: i64,
    name: &str,
    description: Option<&str>,
) -> Result<ItemJson> {
    let query = "UPDATE items SET name = $1, description = $2 WHERE id = $3 \
                 RETURNING id, name, description, user_id";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(name)
        .bind(description)
        .bind(id)
        .fetch_one(pool)
        .instrument(span)
        .await
        .context("failed to update item")?;

    Ok(item_from_row(&row))
}

pub(super) async fn delete_item(pool: &PgPool, id: i64) -> Result<()> {
    let query = "DELETE FROM items WHERE id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(id)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to delete item")?;

    Ok(())
}
