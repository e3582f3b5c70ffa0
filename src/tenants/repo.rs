use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::{UpdateRestaurantRequest, UpsertBrandingRequest};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Restaurant {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub cover_url: Option<String>,
    pub is_open: bool,
    pub is_active: bool,
    pub delivery_enabled: bool,
    pub pickup_enabled: bool,
    pub minimum_order: Decimal,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TenantBranding {
    pub restaurant_id: Uuid,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub header_image_url: Option<String>,
    pub header_title: Option<String>,
    pub header_subtitle: Option<String>,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    pub updated_at: OffsetDateTime,
}

const RESTAURANT_COLUMNS: &str = r#"
    id, owner_id, slug, name, description, logo_url, cover_url,
    is_open, is_active, delivery_enabled, pickup_enabled,
    minimum_order, latitude, longitude, created_at
"#;

pub async fn find_by_slug(db: &PgPool, slug: &str) -> anyhow::Result<Option<Restaurant>> {
    let row = sqlx::query_as::<_, Restaurant>(&format!(
        "SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE slug = $1"
    ))
    .bind(slug)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn get(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Restaurant>> {
    let row = sqlx::query_as::<_, Restaurant>(&format!(
        "SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn list_active(db: &PgPool, limit: i64, offset: i64) -> anyhow::Result<Vec<Restaurant>> {
    let rows = sqlx::query_as::<_, Restaurant>(&format!(
        r#"
        SELECT {RESTAURANT_COLUMNS}
        FROM restaurants
        WHERE is_active
        ORDER BY name ASC
        LIMIT $1 OFFSET $2
        "#
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn list_all(db: &PgPool, limit: i64, offset: i64) -> anyhow::Result<Vec<Restaurant>> {
    let rows = sqlx::query_as::<_, Restaurant>(&format!(
        r#"
        SELECT {RESTAURANT_COLUMNS}
        FROM restaurants
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Partial update: absent fields keep their current value. The slug is
/// immutable once published, so it is deliberately not updatable here.
pub async fn update_settings(
    db: &PgPool,
    id: Uuid,
    req: &UpdateRestaurantRequest,
) -> anyhow::Result<Option<Restaurant>> {
    let row = sqlx::query_as::<_, Restaurant>(&format!(
        r#"
        UPDATE restaurants SET
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            logo_url = COALESCE($4, logo_url),
            cover_url = COALESCE($5, cover_url),
            is_open = COALESCE($6, is_open),
            delivery_enabled = COALESCE($7, delivery_enabled),
            pickup_enabled = COALESCE($8, pickup_enabled),
            minimum_order = COALESCE($9, minimum_order),
            latitude = COALESCE($10, latitude),
            longitude = COALESCE($11, longitude)
        WHERE id = $1
        RETURNING {RESTAURANT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(req.name.as_deref())
    .bind(req.description.as_deref())
    .bind(req.logo_url.as_deref())
    .bind(req.cover_url.as_deref())
    .bind(req.is_open)
    .bind(req.delivery_enabled)
    .bind(req.pickup_enabled)
    .bind(req.minimum_order)
    .bind(req.latitude)
    .bind(req.longitude)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn set_active(db: &PgPool, id: Uuid, is_active: bool) -> anyhow::Result<Option<Restaurant>> {
    let row = sqlx::query_as::<_, Restaurant>(&format!(
        r#"
        UPDATE restaurants SET is_active = $2
        WHERE id = $1
        RETURNING {RESTAURANT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(is_active)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn find_branding(
    db: &PgPool,
    restaurant_id: Uuid,
) -> anyhow::Result<Option<TenantBranding>> {
    let row = sqlx::query_as::<_, TenantBranding>(
        r#"
        SELECT restaurant_id, primary_color, secondary_color, background_color,
               text_color, header_image_url, header_title, header_subtitle,
               logo_url, favicon_url, updated_at
        FROM tenant_branding
        WHERE restaurant_id = $1
        "#,
    )
    .bind(restaurant_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn upsert_branding(
    db: &PgPool,
    restaurant_id: Uuid,
    req: &UpsertBrandingRequest,
) -> anyhow::Result<TenantBranding> {
    let row = sqlx::query_as::<_, TenantBranding>(
        r#"
        INSERT INTO tenant_branding (
            restaurant_id, primary_color, secondary_color, background_color,
            text_color, header_image_url, header_title, header_subtitle,
            logo_url, favicon_url, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, now())
        ON CONFLICT (restaurant_id) DO UPDATE SET
            primary_color = EXCLUDED.primary_color,
            secondary_color = EXCLUDED.secondary_color,
            background_color = EXCLUDED.background_color,
            text_color = EXCLUDED.text_color,
            header_image_url = EXCLUDED.header_image_url,
            header_title = EXCLUDED.header_title,
            header_subtitle = EXCLUDED.header_subtitle,
            logo_url = EXCLUDED.logo_url,
            favicon_url = EXCLUDED.favicon_url,
            updated_at = now()
        RETURNING restaurant_id, primary_color, secondary_color, background_color,
                  text_color, header_image_url, header_title, header_subtitle,
                  logo_url, favicon_url, updated_at
        "#,
    )
    .bind(restaurant_id)
    .bind(req.primary_color.as_deref())
    .bind(req.secondary_color.as_deref())
    .bind(req.background_color.as_deref())
    .bind(req.text_color.as_deref())
    .bind(req.header_image_url.as_deref())
    .bind(req.header_title.as_deref())
    .bind(req.header_subtitle.as_deref())
    .bind(req.logo_url.as_deref())
    .bind(req.favicon_url.as_deref())
    .fetch_one(db)
    .await?;
    Ok(row)
}
