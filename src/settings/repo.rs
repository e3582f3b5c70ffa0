use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::hours::BusinessHours;

use super::dto::UpdateGlobalSettingsRequest;

/// Weekly schedule for a restaurant, stored as one opaque JSONB value.
/// A missing row (or missing days in the value) falls back to defaults.
pub async fn business_hours(db: &PgPool, restaurant_id: Uuid) -> anyhow::Result<BusinessHours> {
    let row: Option<(serde_json::Value,)> =
        sqlx::query_as("SELECT business_hours FROM store_settings WHERE restaurant_id = $1")
            .bind(restaurant_id)
            .fetch_optional(db)
            .await?;

    match row {
        Some((value,)) => Ok(serde_json::from_value(value)?),
        None => Ok(BusinessHours::default()),
    }
}

pub async fn upsert_business_hours(
    db: &PgPool,
    restaurant_id: Uuid,
    hours: &BusinessHours,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO store_settings (restaurant_id, business_hours, updated_at)
        VALUES ($1, $2, now())
        ON CONFLICT (restaurant_id) DO UPDATE SET
            business_hours = EXCLUDED.business_hours,
            updated_at = now()
        "#,
    )
    .bind(restaurant_id)
    .bind(serde_json::to_value(hours)?)
    .execute(db)
    .await?;
    Ok(())
}

/// Marketplace-wide knobs, a single row. Points: `points_earn_per_currency`
/// points accrue per whole currency unit spent; each point is worth
/// `points_redeem_value` at checkout.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct GlobalSettings {
    pub marketplace_name: String,
    pub points_earn_per_currency: i64,
    pub points_redeem_value: Decimal,
    pub updated_at: OffsetDateTime,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            marketplace_name: "Pedeja".into(),
            points_earn_per_currency: 1,
            points_redeem_value: Decimal::new(1, 2), // 0.01 per point
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }
}

pub async fn global(db: &PgPool) -> anyhow::Result<GlobalSettings> {
    let row = sqlx::query_as::<_, GlobalSettings>(
        r#"
        SELECT marketplace_name, points_earn_per_currency, points_redeem_value, updated_at
        FROM global_settings
        WHERE id = 1
        "#,
    )
    .fetch_optional(db)
    .await?;
    Ok(row.unwrap_or_default())
}

pub async fn update_global(
    db: &PgPool,
    req: &UpdateGlobalSettingsRequest,
) -> anyhow::Result<GlobalSettings> {
    let current = global(db).await?;
    let row = sqlx::query_as::<_, GlobalSettings>(
        r#"
        INSERT INTO global_settings (id, marketplace_name, points_earn_per_currency,
                                     points_redeem_value, updated_at)
        VALUES (1, $1, $2, $3, now())
        ON CONFLICT (id) DO UPDATE SET
            marketplace_name = EXCLUDED.marketplace_name,
            points_earn_per_currency = EXCLUDED.points_earn_per_currency,
            points_redeem_value = EXCLUDED.points_redeem_value,
            updated_at = now()
        RETURNING marketplace_name, points_earn_per_currency, points_redeem_value, updated_at
        "#,
    )
    .bind(req.marketplace_name.as_deref().unwrap_or(&current.marketplace_name))
    .bind(req.points_earn_per_currency.unwrap_or(current.points_earn_per_currency))
    .bind(req.points_redeem_value.unwrap_or(current.points_redeem_value))
    .fetch_one(db)
    .await?;
    Ok(row)
}
