use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{self, SessionUser},
    hours,
    state::AppState,
};

use super::dto::{
    BrandingView, Pagination, RestaurantView, StorefrontResponse, UpdateRestaurantRequest,
    UpsertBrandingRequest,
};
use super::{repo, services};

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(list_restaurants))
        .route("/storefront/:slug", get(get_storefront))
}

pub fn owner_routes() -> Router<AppState> {
    Router::new()
        .route("/restaurants/:id/settings", put(update_settings))
        .route("/restaurants/:id/branding", put(upsert_branding))
}

/// Marketplace landing page: every active restaurant.
#[instrument(skip(state))]
async fn list_restaurants(
    State(state): State<AppState>,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<RestaurantView>>, (StatusCode, String)> {
    let restaurants = repo::list_active(&state.db, p.limit, p.offset)
        .await
        .map_err(internal)?;
    Ok(Json(restaurants.into_iter().map(Into::into).collect()))
}

/// One round trip for the tenant shell: restaurant, effective branding,
/// theme variables and the current open/closed status.
#[instrument(skip(state))]
async fn get_storefront(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<StorefrontResponse>, (StatusCode, String)> {
    let resolved = services::resolve_by_slug(&state.db, &slug)
        .await
        .map_err(|e| {
            if let services::ResolveError::Backend(source) = &e {
                error!(error = %source, %slug, "storefront resolution failed");
            } else {
                warn!(%slug, reason = %e, "storefront unavailable");
            }
            (e.status(), e.to_string())
        })?;

    let schedule = crate::settings::repo::business_hours(&state.db, resolved.restaurant.id)
        .await
        .map_err(internal)?;
    let status = hours::evaluate(&schedule, OffsetDateTime::now_utc());

    Ok(Json(StorefrontResponse {
        restaurant: resolved.restaurant.into(),
        branding: resolved.branding.into(),
        theme: resolved.theme,
        hours: status,
    }))
}

#[instrument(skip(state, req))]
async fn update_settings(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRestaurantRequest>,
) -> Result<Json<RestaurantView>, (StatusCode, String)> {
    auth::require_owner(&state, user_id, id).await?;

    if let Some(minimum) = req.minimum_order {
        if minimum.is_sign_negative() {
            return Err((
                StatusCode::BAD_REQUEST,
                "Pedido mínimo não pode ser negativo".into(),
            ));
        }
    }

    let restaurant = repo::update_settings(&state.db, id, &req)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Restaurante não encontrado".to_string()))?;

    info!(restaurant_id = %id, %user_id, "restaurant settings updated");
    Ok(Json(restaurant.into()))
}

#[instrument(skip(state, req))]
async fn upsert_branding(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpsertBrandingRequest>,
) -> Result<Json<BrandingView>, (StatusCode, String)> {
    auth::require_owner(&state, user_id, id).await?;

    if let Some(value) = req.invalid_color() {
        warn!(restaurant_id = %id, value, "rejected malformed branding color");
        return Err((StatusCode::BAD_REQUEST, format!("Cor inválida: {value}")));
    }

    let branding = repo::upsert_branding(&state.db, id, &req)
        .await
        .map_err(internal)?;

    info!(restaurant_id = %id, %user_id, "branding updated");
    Ok(Json(branding.into()))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "tenants handler failure");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
