use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::{CreateProductRequest, UpdateProductRequest};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub is_available: bool,
    pub created_at: OffsetDateTime,
}

const PRODUCT_COLUMNS: &str = r#"
    id, restaurant_id, name, description, price, image_url,
    category, is_available, created_at
"#;

pub async fn get(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Product>> {
    let row = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM db_products WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Storefront listing: available products only, optionally narrowed by
/// category and a case-insensitive name search.
pub async fn list_available(
    db: &PgPool,
    restaurant_id: Uuid,
    category: Option<&str>,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<Product>> {
    let rows = sqlx::query_as::<_, Product>(&format!(
        r#"
        SELECT {PRODUCT_COLUMNS}
        FROM db_products
        WHERE restaurant_id = $1
          AND is_available
          AND ($2::text IS NULL OR category = $2)
          AND ($3::text IS NULL OR name ILIKE '%' || $3 || '%')
        ORDER BY category NULLS LAST, name ASC
        LIMIT $4 OFFSET $5
        "#
    ))
    .bind(restaurant_id)
    .bind(category)
    .bind(search)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Owner listing: includes unavailable products.
pub async fn list_all(
    db: &PgPool,
    restaurant_id: Uuid,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<Product>> {
    let rows = sqlx::query_as::<_, Product>(&format!(
        r#"
        SELECT {PRODUCT_COLUMNS}
        FROM db_products
        WHERE restaurant_id = $1
        ORDER BY category NULLS LAST, name ASC
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(restaurant_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn list_categories(db: &PgPool, restaurant_id: Uuid) -> anyhow::Result<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT DISTINCT category
        FROM db_products
        WHERE restaurant_id = $1 AND category IS NOT NULL AND is_available
        ORDER BY category ASC
        "#,
    )
    .bind(restaurant_id)
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(|(c,)| c).collect())
}

pub async fn create(
    db: &PgPool,
    restaurant_id: Uuid,
    req: &CreateProductRequest,
) -> anyhow::Result<Product> {
    let row = sqlx::query_as::<_, Product>(&format!(
        r#"
        INSERT INTO db_products (id, restaurant_id, name, description, price,
                                 image_url, category, is_available)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {PRODUCT_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(restaurant_id)
    .bind(&req.name)
    .bind(req.description.as_deref())
    .bind(req.price)
    .bind(req.image_url.as_deref())
    .bind(req.category.as_deref())
    .bind(req.is_available)
    .fetch_one(db)
    .await?;
    Ok(row)
}

/// Partial update scoped to the owning restaurant; `None` when the
/// product does not belong to it.
pub async fn update(
    db: &PgPool,
    restaurant_id: Uuid,
    product_id: Uuid,
    req: &UpdateProductRequest,
) -> anyhow::Result<Option<Product>> {
    let row = sqlx::query_as::<_, Product>(&format!(
        r#"
        UPDATE db_products SET
            name = COALESCE($3, name),
            description = COALESCE($4, description),
            price = COALESCE($5, price),
            image_url = COALESCE($6, image_url),
            category = COALESCE($7, category),
            is_available = COALESCE($8, is_available)
        WHERE id = $2 AND restaurant_id = $1
        RETURNING {PRODUCT_COLUMNS}
        "#
    ))
    .bind(restaurant_id)
    .bind(product_id)
    .bind(req.name.as_deref())
    .bind(req.description.as_deref())
    .bind(req.price)
    .bind(req.image_url.as_deref())
    .bind(req.category.as_deref())
    .bind(req.is_available)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn delete(db: &PgPool, restaurant_id: Uuid, product_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM db_products WHERE id = $2 AND restaurant_id = $1")
        .bind(restaurant_id)
        .bind(product_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
