use sqlx::PgPool;

use crate::db::models::Item;

const ITEM_COLUMNS: &str = "id, name, description, created_at, updated_at";

pub(crate) struct CreateItem<'a> {
    pub(crate) name: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

/// `None` keeps the column; an empty description stores NULL.
pub(crate) struct UpdateItem {
    pub(crate) name: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn list(pool: &PgPool) -> Result<Vec<Item>, sqlx::Error> {
    sqlx::query_as::<_, Item>(&format!("SELECT {ITEM_COLUMNS} FROM items ORDER BY id"))
        .fetch_all(pool)
        .await
}

pub(crate) async fn create(pool: &PgPool, params: CreateItem<'_>) -> Result<Item, sqlx::Error> {
    sqlx::query_as::<_, Item>(&format!(
        "INSERT INTO items (name, description, created_at, updated_at)
         VALUES ($1,$2,$3,$4)
         RETURNING {ITEM_COLUMNS}",
    ))
    .bind(params.name)
    .bind(params.description)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    id: i64,
    params: UpdateItem,
) -> Result<Option<Item>, sqlx::Error> {
    sqlx::query_as::<_, Item>(&format!(
        "UPDATE items SET
            name = COALESCE($1, name),
            description = CASE WHEN $2::text IS NULL THEN description ELSE NULLIF($2, '') END,
            updated_at = $3
         WHERE id = $4
         RETURNING {ITEM_COLUMNS}",
    ))
    .bind(params.name)
    .bind(params.description)
    .bind(params.updated_at)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM items WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

/// Fails when the database or the `items` table is unreachable.
pub(crate) async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1 FROM items LIMIT 1").execute(pool).await?;
    Ok(())
}
