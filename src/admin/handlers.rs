use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::json;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{self, Role, SessionUser},
    settings,
    state::AppState,
    tenants,
};

use super::dto::{AssignRoleRequest, CreateLeadRequest, Pagination, SetActiveRequest};
use super::repo::{self, AuditLog, Lead};

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/leads", post(create_lead))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/restaurants", get(list_all_restaurants))
        .route("/admin/restaurants/:id/active", patch(set_restaurant_active))
        .route("/admin/users/:id/role", patch(assign_user_role))
        .route("/admin/settings", get(get_global_settings).put(put_global_settings))
        .route("/admin/audit-logs", get(list_audit_logs))
        .route("/admin/leads", get(list_leads))
}

/// Marketplace landing-page lead capture; the only unauthenticated write
/// in the service.
#[instrument(skip(state, req))]
async fn create_lead(
    State(state): State<AppState>,
    Json(req): Json<CreateLeadRequest>,
) -> Result<(StatusCode, Json<Lead>), (StatusCode, String)> {
    if let Err(msg) = req.validate() {
        return Err((StatusCode::BAD_REQUEST, msg.to_string()));
    }
    let lead = repo::insert_lead(
        &state.db,
        req.name.trim(),
        req.email.trim(),
        req.phone.as_deref(),
        req.message.as_deref(),
    )
    .await
    .map_err(internal)?;
    info!(lead_id = %lead.id, "lead captured");
    Ok((StatusCode::CREATED, Json(lead)))
}

#[instrument(skip(state))]
async fn list_all_restaurants(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<tenants::repo::Restaurant>>, (StatusCode, String)> {
    auth::require_role(&state, user_id, Role::Admin).await?;
    let restaurants = tenants::repo::list_all(&state.db, p.limit, p.offset)
        .await
        .map_err(internal)?;
    Ok(Json(restaurants))
}

#[instrument(skip(state, req))]
async fn set_restaurant_active(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Path(id): Path<Uuid>,
    Json(req): Json<SetActiveRequest>,
) -> Result<Json<tenants::repo::Restaurant>, (StatusCode, String)> {
    auth::require_role(&state, user_id, Role::Admin).await?;

    let restaurant = tenants::repo::set_active(&state.db, id, req.is_active)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Restaurante não encontrado".to_string()))?;

    if let Err(e) = repo::insert_audit(
        &state.db,
        user_id,
        if req.is_active { "restaurant.activate" } else { "restaurant.deactivate" },
        &format!("restaurants/{id}"),
        json!({ "is_active": req.is_active }),
    )
    .await
    {
        // The toggle already happened; a missing audit row is logged, not fatal.
        warn!(error = %e, %id, "audit write failed");
    }

    info!(restaurant_id = %id, is_active = req.is_active, %user_id, "restaurant activation toggled");
    Ok(Json(restaurant))
}

/// Promotes or demotes a user. Lojista is granted here when a restaurant
/// owner is onboarded; there is no self-service path to it.
#[instrument(skip(state, req))]
async fn assign_user_role(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Path(id): Path<Uuid>,
    Json(req): Json<AssignRoleRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    auth::require_role(&state, user_id, Role::Admin).await?;

    auth::repo::assign_role(&state.db, id, req.role)
        .await
        .map_err(internal)?;

    if let Err(e) = repo::insert_audit(
        &state.db,
        user_id,
        "user.assign_role",
        &format!("users/{id}"),
        json!({ "role": req.role.as_str() }),
    )
    .await
    {
        warn!(error = %e, %id, "audit write failed");
    }

    info!(target_id = %id, role = req.role.as_str(), %user_id, "role assigned");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
async fn get_global_settings(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
) -> Result<Json<settings::repo::GlobalSettings>, (StatusCode, String)> {
    auth::require_role(&state, user_id, Role::Admin).await?;
    let global = settings::repo::global(&state.db).await.map_err(internal)?;
    Ok(Json(global))
}

#[instrument(skip(state, req))]
async fn put_global_settings(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Json(req): Json<settings::dto::UpdateGlobalSettingsRequest>,
) -> Result<Json<settings::repo::GlobalSettings>, (StatusCode, String)> {
    auth::require_role(&state, user_id, Role::Admin).await?;

    if let Some(earn) = req.points_earn_per_currency {
        if earn < 0 {
            return Err((StatusCode::BAD_REQUEST, "Taxa de pontos inválida".into()));
        }
    }
    if let Some(value) = req.points_redeem_value {
        if value.is_sign_negative() {
            return Err((StatusCode::BAD_REQUEST, "Valor de resgate inválido".into()));
        }
    }

    let global = settings::repo::update_global(&state.db, &req)
        .await
        .map_err(internal)?;

    if let Err(e) = repo::insert_audit(
        &state.db,
        user_id,
        "settings.update",
        "global_settings",
        serde_json::to_value(&global).unwrap_or(json!({})),
    )
    .await
    {
        warn!(error = %e, "audit write failed");
    }

    Ok(Json(global))
}

#[instrument(skip(state))]
async fn list_audit_logs(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<AuditLog>>, (StatusCode, String)> {
    auth::require_role(&state, user_id, Role::Admin).await?;
    let logs = repo::list_audit(&state.db, p.limit, p.offset)
        .await
        .map_err(internal)?;
    Ok(Json(logs))
}

#[instrument(skip(state))]
async fn list_leads(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<Lead>>, (StatusCode, String)> {
    auth::require_role(&state, user_id, Role::Admin).await?;
    let leads = repo::list_leads(&state.db, p.limit, p.offset)
        .await
        .map_err(internal)?;
    Ok(Json(leads))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "admin handler failure");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
