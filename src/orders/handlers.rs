use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{self, Role, SessionUser},
    state::AppState,
};

use super::dto::{CheckoutRequest, OrderDetails, OrderListQuery, UpdateStatusRequest};
use super::repo;
use super::services::{self, CheckoutError, OrderStatus};

pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", post(checkout))
        .route("/orders/:id", get(get_order))
}

pub fn owner_routes() -> Router<AppState> {
    Router::new()
        .route("/restaurants/:id/orders", get(list_restaurant_orders))
        .route(
            "/restaurants/:id/orders/:order_id/status",
            patch(update_order_status),
        )
}

#[instrument(skip(state, req))]
async fn checkout(
    State(state): State<AppState>,
    SessionUser(customer_id): SessionUser,
    Json(req): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<OrderDetails>), (StatusCode, String)> {
    if req.customer_name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Nome é obrigatório".into()));
    }
    if req.customer_phone.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Telefone é obrigatório".into()));
    }

    let (order, items) = services::place_order(&state, customer_id, &req)
        .await
        .map_err(|e| {
            if let CheckoutError::Backend(source) = &e {
                error!(error = %source, %customer_id, "checkout failed");
            } else {
                warn!(%customer_id, reason = %e, "checkout rejected");
            }
            (e.status(), e.to_string())
        })?;

    Ok((StatusCode::CREATED, Json(OrderDetails { order, items })))
}

/// An order is visible to its customer and to the restaurant side
/// (owner or admin).
#[instrument(skip(state))]
async fn get_order(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderDetails>, (StatusCode, String)> {
    let order = repo::get(&state.db, id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Pedido não encontrado".to_string()))?;

    if order.customer_id != user_id {
        auth::require_owner(&state, user_id, order.restaurant_id).await?;
    }

    let items = repo::items_for(&state.db, order.id).await.map_err(internal)?;
    Ok(Json(OrderDetails { order, items }))
}

#[instrument(skip(state))]
async fn list_restaurant_orders(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Path(id): Path<Uuid>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<repo::Order>>, (StatusCode, String)> {
    auth::require_owner(&state, user_id, id).await?;
    let orders = repo::list_by_restaurant(
        &state.db,
        id,
        query.status.map(OrderStatus::as_str),
        query.limit,
        query.offset,
    )
    .await
    .map_err(internal)?;
    Ok(Json(orders))
}

#[instrument(skip(state, req))]
async fn update_order_status(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Path((id, order_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<repo::Order>, (StatusCode, String)> {
    let role = auth::require_role(&state, user_id, Role::Lojista).await?;
    if role != Role::Admin {
        auth::require_owner(&state, user_id, id).await?;
    }

    let order = repo::get(&state.db, order_id)
        .await
        .map_err(internal)?
        .filter(|o| o.restaurant_id == id)
        .ok_or((StatusCode::NOT_FOUND, "Pedido não encontrado".to_string()))?;

    let current: OrderStatus = order
        .status
        .parse()
        .map_err(|e: anyhow::Error| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    if !current.can_transition(req.status) {
        warn!(
            %order_id,
            from = current.as_str(),
            to = req.status.as_str(),
            "invalid status transition"
        );
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            format!(
                "Transição de status inválida: {} para {}",
                current.as_str(),
                req.status.as_str()
            ),
        ));
    }

    let updated = repo::update_status(&state.db, id, order_id, current.as_str(), req.status.as_str())
        .await
        .map_err(internal)?
        .ok_or((
            StatusCode::CONFLICT,
            "O pedido mudou de status; recarregue e tente novamente".to_string(),
        ))?;

    info!(%order_id, status = req.status.as_str(), "order status updated");
    Ok(Json(updated))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "orders handler failure");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
