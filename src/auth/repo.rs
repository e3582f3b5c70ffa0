use sqlx::PgPool;
use uuid::Uuid;

use super::role::Role;

/// Role lookup. A user without a row is an ordinary customer; a row with
/// an unrecognized value is surfaced as an error instead of being coerced.
pub async fn fetch_role(db: &PgPool, user_id: Uuid) -> anyhow::Result<Role> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT role FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(db)
            .await?;

    match row {
        Some((value,)) => value.parse(),
        None => Ok(Role::User),
    }
}

pub async fn assign_role(db: &PgPool, user_id: Uuid, role: Role) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_roles (user_id, role)
        VALUES ($1, $2)
        ON CONFLICT (user_id) DO UPDATE SET role = EXCLUDED.role
        "#,
    )
    .bind(user_id)
    .bind(role.as_str())
    .execute(db)
    .await?;
    Ok(())
}
