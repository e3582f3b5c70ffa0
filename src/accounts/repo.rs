use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::UpsertProfileRequest;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub default_address: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

pub async fn get(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
    let row = sqlx::query_as::<_, Profile>(
        r#"
        SELECT id, name, phone, default_address, created_at, updated_at
        FROM profiles
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn upsert(
    db: &PgPool,
    user_id: Uuid,
    req: &UpsertProfileRequest,
) -> anyhow::Result<Profile> {
    let row = sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO profiles (id, name, phone, default_address, updated_at)
        VALUES ($1, $2, $3, $4, now())
        ON CONFLICT (id) DO UPDATE SET
            name = COALESCE(EXCLUDED.name, profiles.name),
            phone = COALESCE(EXCLUDED.phone, profiles.phone),
            default_address = COALESCE(EXCLUDED.default_address, profiles.default_address),
            updated_at = now()
        RETURNING id, name, phone, default_address, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(req.name.as_deref())
    .bind(req.phone.as_deref())
    .bind(req.default_address.as_deref())
    .fetch_one(db)
    .await?;
    Ok(row)
}
