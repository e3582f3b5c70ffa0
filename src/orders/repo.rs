use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub customer_phone: String,
    pub fulfillment: String,
    pub delivery_address: Option<String>,
    pub status: String,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub points_redeemed: i64,
    pub points_earned: i64,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PointsEntry {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub order_id: Option<Uuid>,
    pub points: i64,
    pub reason: String,
    pub created_at: OffsetDateTime,
}

const ORDER_COLUMNS: &str = r#"
    id, restaurant_id, customer_id, customer_name, customer_phone,
    fulfillment, delivery_address, status, subtotal, discount, total,
    points_redeemed, points_earned, created_at
"#;

pub async fn insert_order_tx(
    tx: &mut Transaction<'_, Postgres>,
    order: &Order,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO orders (id, restaurant_id, customer_id, customer_name,
                            customer_phone, fulfillment, delivery_address, status,
                            subtotal, discount, total, points_redeemed,
                            points_earned, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        "#,
    )
    .bind(order.id)
    .bind(order.restaurant_id)
    .bind(order.customer_id)
    .bind(&order.customer_name)
    .bind(&order.customer_phone)
    .bind(&order.fulfillment)
    .bind(order.delivery_address.as_deref())
    .bind(&order.status)
    .bind(order.subtotal)
    .bind(order.discount)
    .bind(order.total)
    .bind(order.points_redeemed)
    .bind(order.points_earned)
    .bind(order.created_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn insert_item_tx(
    tx: &mut Transaction<'_, Postgres>,
    item: &OrderItem,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO order_items (id, order_id, product_id, product_name, unit_price, quantity)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(item.id)
    .bind(item.order_id)
    .bind(item.product_id)
    .bind(&item.product_name)
    .bind(item.unit_price)
    .bind(item.quantity)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn insert_points_tx(
    tx: &mut Transaction<'_, Postgres>,
    customer_id: Uuid,
    order_id: Option<Uuid>,
    points: i64,
    reason: &str,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO points_transactions (id, customer_id, order_id, points, reason)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(customer_id)
    .bind(order_id)
    .bind(points)
    .bind(reason)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Balance read under a transaction-scoped per-customer advisory lock.
/// Concurrent redemptions for the same customer serialize on the lock, so
/// the value holds until the transaction commits and the balance cannot be
/// driven negative by racing checkouts.
pub async fn points_balance_locked(
    tx: &mut Transaction<'_, Postgres>,
    customer_id: Uuid,
) -> anyhow::Result<i64> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1::text))")
        .bind(customer_id)
        .execute(&mut **tx)
        .await?;
    let (balance,): (i64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(points), 0)::bigint FROM points_transactions WHERE customer_id = $1",
    )
    .bind(customer_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(balance)
}

pub async fn points_balance(db: &PgPool, customer_id: Uuid) -> anyhow::Result<i64> {
    let (balance,): (i64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(points), 0)::bigint FROM points_transactions WHERE customer_id = $1",
    )
    .bind(customer_id)
    .fetch_one(db)
    .await?;
    Ok(balance)
}

pub async fn points_history(
    db: &PgPool,
    customer_id: Uuid,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<PointsEntry>> {
    let rows = sqlx::query_as::<_, PointsEntry>(
        r#"
        SELECT id, customer_id, order_id, points, reason, created_at
        FROM points_transactions
        WHERE customer_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(customer_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn get(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Order>> {
    let row = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn items_for(db: &PgPool, order_id: Uuid) -> anyhow::Result<Vec<OrderItem>> {
    let rows = sqlx::query_as::<_, OrderItem>(
        r#"
        SELECT id, order_id, product_id, product_name, unit_price, quantity
        FROM order_items
        WHERE order_id = $1
        "#,
    )
    .bind(order_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn list_by_customer(
    db: &PgPool,
    customer_id: Uuid,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<Order>> {
    let rows = sqlx::query_as::<_, Order>(&format!(
        r#"
        SELECT {ORDER_COLUMNS}
        FROM orders
        WHERE customer_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(customer_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn list_by_restaurant(
    db: &PgPool,
    restaurant_id: Uuid,
    status: Option<&str>,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<Order>> {
    let rows = sqlx::query_as::<_, Order>(&format!(
        r#"
        SELECT {ORDER_COLUMNS}
        FROM orders
        WHERE restaurant_id = $1
          AND ($2::text IS NULL OR status = $2)
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#
    ))
    .bind(restaurant_id)
    .bind(status)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Compare-and-swap on the status column: the update only lands if the
/// order is still in `from`, so two racing updates cannot both apply a
/// transition validated against the same stale status. `None` means the
/// order moved on (or is not this restaurant's).
pub async fn update_status(
    db: &PgPool,
    restaurant_id: Uuid,
    order_id: Uuid,
    from: &str,
    to: &str,
) -> anyhow::Result<Option<Order>> {
    let row = sqlx::query_as::<_, Order>(&format!(
        r#"
        UPDATE orders SET status = $4
        WHERE id = $2 AND restaurant_id = $1 AND status = $3
        RETURNING {ORDER_COLUMNS}
        "#
    ))
    .bind(restaurant_id)
    .bind(order_id)
    .bind(from)
    .bind(to)
    .fetch_optional(db)
    .await?;
    Ok(row)
}
