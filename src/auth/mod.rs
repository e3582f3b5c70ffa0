use axum::{http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use tracing::{error, instrument};
use uuid::Uuid;

use crate::state::AppState;

pub mod repo;
mod role;
mod session;

pub use role::Role;
pub use session::SessionUser;

pub fn router() -> Router<AppState> {
    Router::new().route("/session/panel", get(session_panel))
}

#[derive(Debug, Serialize)]
struct PanelResponse {
    role: Role,
    panel: &'static str,
}

/// Post-login dispatch: tells the shell which panel this session lands on.
#[instrument(skip(state))]
async fn session_panel(
    axum::extract::State(state): axum::extract::State<AppState>,
    SessionUser(user_id): SessionUser,
) -> Result<Json<PanelResponse>, (StatusCode, String)> {
    let role = repo::fetch_role(&state.db, user_id).await.map_err(|e| {
        error!(error = %e, %user_id, "role lookup failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    Ok(Json(PanelResponse {
        role,
        panel: role.panel_path(),
    }))
}

/// Guard for panel handlers. Admin passes every check.
pub async fn require_role(
    state: &AppState,
    user_id: Uuid,
    wanted: Role,
) -> Result<Role, (StatusCode, String)> {
    let role = repo::fetch_role(&state.db, user_id).await.map_err(|e| {
        error!(error = %e, %user_id, "role lookup failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    if !role.satisfies(wanted) {
        return Err((StatusCode::FORBIDDEN, "Acesso negado".to_string()));
    }
    Ok(role)
}

/// Guard for restaurant-scoped owner operations: the caller must own the
/// restaurant or be an admin.
pub async fn require_owner(
    state: &AppState,
    user_id: Uuid,
    restaurant_id: Uuid,
) -> Result<(), (StatusCode, String)> {
    let role = require_role(state, user_id, Role::Lojista).await?;
    if role == Role::Admin {
        return Ok(());
    }
    let restaurant = crate::tenants::repo::get(&state.db, restaurant_id)
        .await
        .map_err(|e| {
            error!(error = %e, %restaurant_id, "restaurant lookup failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?
        .ok_or((StatusCode::NOT_FOUND, "Restaurante não encontrado".to_string()))?;
    if restaurant.owner_id != user_id {
        return Err((StatusCode::FORBIDDEN, "Acesso negado".to_string()));
    }
    Ok(())
}
