use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLog {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub action: String,
    pub target: String,
    pub detail: serde_json::Value,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub created_at: OffsetDateTime,
}

pub async fn insert_audit(
    db: &PgPool,
    actor_id: Uuid,
    action: &str,
    target: &str,
    detail: serde_json::Value,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, actor_id, action, target, detail)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(actor_id)
    .bind(action)
    .bind(target)
    .bind(detail)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn list_audit(db: &PgPool, limit: i64, offset: i64) -> anyhow::Result<Vec<AuditLog>> {
    let rows = sqlx::query_as::<_, AuditLog>(
        r#"
        SELECT id, actor_id, action, target, detail, created_at
        FROM audit_logs
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn insert_lead(
    db: &PgPool,
    name: &str,
    email: &str,
    phone: Option<&str>,
    message: Option<&str>,
) -> anyhow::Result<Lead> {
    let row = sqlx::query_as::<_, Lead>(
        r#"
        INSERT INTO leads (id, name, email, phone, message)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, email, phone, message, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(phone)
    .bind(message)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn list_leads(db: &PgPool, limit: i64, offset: i64) -> anyhow::Result<Vec<Lead>> {
    let rows = sqlx::query_as::<_, Lead>(
        r#"
        SELECT id, name, email, phone, message, created_at
        FROM leads
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
