use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{self, SessionUser},
    hours::BusinessHours,
    state::AppState,
};

use super::repo;

pub fn routes() -> Router<AppState> {
    Router::new().route("/restaurants/:id/hours", get(get_hours).put(put_hours))
}

#[instrument(skip(state))]
async fn get_hours(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BusinessHours>, (StatusCode, String)> {
    auth::require_owner(&state, user_id, id).await?;
    let hours = repo::business_hours(&state.db, id).await.map_err(internal)?;
    Ok(Json(hours))
}

#[instrument(skip(state, hours))]
async fn put_hours(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Path(id): Path<Uuid>,
    Json(hours): Json<BusinessHours>,
) -> Result<Json<BusinessHours>, (StatusCode, String)> {
    auth::require_owner(&state, user_id, id).await?;

    if let Err(e) = hours.validate() {
        warn!(restaurant_id = %id, reason = %e, "rejected business hours");
        return Err((StatusCode::BAD_REQUEST, e.to_string()));
    }

    repo::upsert_business_hours(&state.db, id, &hours)
        .await
        .map_err(internal)?;
    info!(restaurant_id = %id, %user_id, "business hours updated");
    Ok(Json(hours))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "settings handler failure");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
