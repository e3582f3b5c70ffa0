use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{error, instrument};

use crate::{auth::SessionUser, orders, state::AppState};

use super::dto::{Pagination, PointsResponse, UpsertProfileRequest};
use super::repo::{self, Profile};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me/profile", get(get_profile).put(put_profile))
        .route("/me/points", get(get_points))
        .route("/me/orders", get(list_my_orders))
}

#[instrument(skip(state))]
async fn get_profile(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
) -> Result<Json<Profile>, (StatusCode, String)> {
    let profile = repo::get(&state.db, user_id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Perfil não encontrado".to_string()))?;
    Ok(Json(profile))
}

#[instrument(skip(state, req))]
async fn put_profile(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Json(req): Json<UpsertProfileRequest>,
) -> Result<Json<Profile>, (StatusCode, String)> {
    if let Some(name) = &req.name {
        if name.trim().is_empty() {
            return Err((StatusCode::BAD_REQUEST, "Nome não pode ser vazio".into()));
        }
    }
    let profile = repo::upsert(&state.db, user_id, &req)
        .await
        .map_err(internal)?;
    Ok(Json(profile))
}

#[instrument(skip(state))]
async fn get_points(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Query(p): Query<Pagination>,
) -> Result<Json<PointsResponse>, (StatusCode, String)> {
    let balance = orders::repo::points_balance(&state.db, user_id)
        .await
        .map_err(internal)?;
    let history = orders::repo::points_history(&state.db, user_id, p.limit, p.offset)
        .await
        .map_err(internal)?;
    Ok(Json(PointsResponse { balance, history }))
}

#[instrument(skip(state))]
async fn list_my_orders(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<orders::repo::Order>>, (StatusCode, String)> {
    let list = orders::repo::list_by_customer(&state.db, user_id, p.limit, p.offset)
        .await
        .map_err(internal)?;
    Ok(Json(list))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "accounts handler failure");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
