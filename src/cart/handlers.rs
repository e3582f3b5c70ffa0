use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::state::AppState;

use super::dto::{
    AddItemRequest, AddItemResponse, CartView, SessionResponse, UpdateQuantityRequest,
};
use super::model::CartRestaurant;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/carts", post(create_session))
        .route("/carts/:session_id", get(get_cart).delete(delete_cart))
        .route("/carts/:session_id/items", post(add_item))
        .route(
            "/carts/:session_id/items/:line_id",
            patch(update_quantity).delete(remove_item),
        )
}

#[instrument(skip(state))]
async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionResponse>) {
    let session_id = state.carts.create_session();
    (StatusCode::CREATED, Json(SessionResponse { session_id }))
}

#[instrument(skip(state))]
async fn get_cart(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<CartView>, (StatusCode, String)> {
    let cart = state.carts.get(session_id).ok_or_else(session_not_found)?;
    Ok(Json(cart.into()))
}

/// Validates the product against the catalog, snapshots its price and
/// appends it to the session's cart. Adding from a different restaurant
/// clears the cart first (clear-and-replace).
#[instrument(skip(state, req))]
async fn add_item(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<AddItemResponse>, (StatusCode, String)> {
    let product = crate::catalog::repo::get(&state.db, req.product_id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Produto não encontrado".to_string()))?;

    if !product.is_available {
        return Err((
            StatusCode::CONFLICT,
            "Este produto não está disponível".to_string(),
        ));
    }

    let restaurant = crate::tenants::repo::get(&state.db, product.restaurant_id)
        .await
        .map_err(internal)?
        .filter(|r| r.is_active)
        .ok_or((
            StatusCode::CONFLICT,
            "Restaurante indisponível".to_string(),
        ))?;

    let outcome = state
        .carts
        .with_cart(session_id, |cart| {
            cart.add_item(
                CartRestaurant {
                    id: restaurant.id,
                    name: restaurant.name.clone(),
                    slug: restaurant.slug.clone(),
                },
                product.id,
                product.name.clone(),
                product.price,
                product.image_url.clone(),
                req.quantity,
            )
        })
        .ok_or_else(session_not_found)?;

    if outcome.cart_switched {
        info!(%session_id, restaurant_id = %restaurant.id, "cart re-scoped to another restaurant");
    }

    let cart = state.carts.get(session_id).ok_or_else(session_not_found)?;
    Ok(Json(AddItemResponse {
        line_id: outcome.line_id,
        cart_switched: outcome.cart_switched,
        cart: cart.into(),
    }))
}

#[instrument(skip(state))]
async fn update_quantity(
    State(state): State<AppState>,
    Path((session_id, line_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateQuantityRequest>,
) -> Result<Json<CartView>, (StatusCode, String)> {
    let updated = state
        .carts
        .with_cart(session_id, |cart| cart.update_quantity(line_id, req.quantity))
        .ok_or_else(session_not_found)?;

    if !updated {
        warn!(%session_id, %line_id, "quantity update for unknown line");
        return Err((StatusCode::NOT_FOUND, "Item não encontrado".to_string()));
    }

    let cart = state.carts.get(session_id).ok_or_else(session_not_found)?;
    Ok(Json(cart.into()))
}

#[instrument(skip(state))]
async fn remove_item(
    State(state): State<AppState>,
    Path((session_id, line_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CartView>, (StatusCode, String)> {
    let removed = state
        .carts
        .with_cart(session_id, |cart| cart.remove_item(line_id))
        .ok_or_else(session_not_found)?;

    if !removed {
        return Err((StatusCode::NOT_FOUND, "Item não encontrado".to_string()));
    }

    let cart = state.carts.get(session_id).ok_or_else(session_not_found)?;
    Ok(Json(cart.into()))
}

/// Removes the session itself, not just its lines, so abandoned carts do
/// not accumulate in the store for the life of the process.
#[instrument(skip(state))]
async fn delete_cart(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if !state.carts.drop_session(session_id) {
        return Err(session_not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}

fn session_not_found() -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, "Sessão de carrinho não encontrada".to_string())
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "cart handler failure");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

#[cfg(test)]
mod handler_tests {
    use super::*;

    #[tokio::test]
    async fn deleting_a_cart_releases_its_session() {
        let state = AppState::fake();
        let (_, Json(session)) = create_session(State(state.clone())).await;
        assert!(state.carts.get(session.session_id).is_some());

        let status = delete_cart(State(state.clone()), Path(session.session_id))
            .await
            .expect("delete should succeed");
        assert_eq!(status, StatusCode::NO_CONTENT);

        // The entry is reclaimed, not merely emptied.
        assert!(state.carts.get(session.session_id).is_none());
        assert!(get_cart(State(state), Path(session.session_id)).await.is_err());
    }

    #[tokio::test]
    async fn deleting_an_unknown_session_is_not_found() {
        let state = AppState::fake();
        let err = delete_cart(State(state), Path(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }
}
