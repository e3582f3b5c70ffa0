use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{self, SessionUser},
    state::AppState,
    tenants,
};

use super::dto::{
    CreateProductRequest, Pagination, ProductQuery, ProductView, UpdateProductRequest,
};
use super::repo::{self, Product};

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/storefront/:slug/products", get(list_storefront_products))
        .route("/storefront/:slug/categories", get(list_storefront_categories))
}

pub fn owner_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/restaurants/:id/products",
            get(list_owner_products).post(create_product),
        )
        .route(
            "/restaurants/:id/products/:product_id",
            axum::routing::put(update_product).delete(delete_product),
        )
}

/// Products for a storefront. Goes through the tenant resolver so
/// inactive or missing restaurants surface the same taxonomy as the
/// storefront shell.
#[instrument(skip(state))]
async fn list_storefront_products(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<ProductView>>, (StatusCode, String)> {
    let resolved = tenants::services::resolve_by_slug(&state.db, &slug)
        .await
        .map_err(|e| (e.status(), e.to_string()))?;

    let products = repo::list_available(
        &state.db,
        resolved.restaurant.id,
        query.category.as_deref(),
        query.q.as_deref(),
        query.limit,
        query.offset,
    )
    .await
    .map_err(internal)?;

    Ok(Json(products.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
async fn list_storefront_categories(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<String>>, (StatusCode, String)> {
    let resolved = tenants::services::resolve_by_slug(&state.db, &slug)
        .await
        .map_err(|e| (e.status(), e.to_string()))?;
    let categories = repo::list_categories(&state.db, resolved.restaurant.id)
        .await
        .map_err(internal)?;
    Ok(Json(categories))
}

#[instrument(skip(state))]
async fn list_owner_products(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Path(id): Path<Uuid>,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<Product>>, (StatusCode, String)> {
    auth::require_owner(&state, user_id, id).await?;
    let products = repo::list_all(&state.db, id, p.limit, p.offset)
        .await
        .map_err(internal)?;
    Ok(Json(products))
}

#[instrument(skip(state, req))]
async fn create_product(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), (StatusCode, String)> {
    auth::require_owner(&state, user_id, id).await?;

    if req.name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Nome é obrigatório".into()));
    }
    if req.price.is_sign_negative() {
        return Err((StatusCode::BAD_REQUEST, "Preço não pode ser negativo".into()));
    }

    let product = repo::create(&state.db, id, &req).await.map_err(internal)?;
    info!(restaurant_id = %id, product_id = %product.id, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip(state, req))]
async fn update_product(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Path((id, product_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<Product>, (StatusCode, String)> {
    auth::require_owner(&state, user_id, id).await?;

    if let Some(price) = req.price {
        if price.is_sign_negative() {
            return Err((StatusCode::BAD_REQUEST, "Preço não pode ser negativo".into()));
        }
    }

    let product = repo::update(&state.db, id, product_id, &req)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Produto não encontrado".to_string()))?;
    Ok(Json(product))
}

#[instrument(skip(state))]
async fn delete_product(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Path((id, product_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, (StatusCode, String)> {
    auth::require_owner(&state, user_id, id).await?;
    let deleted = repo::delete(&state.db, id, product_id)
        .await
        .map_err(internal)?;
    if !deleted {
        warn!(restaurant_id = %id, %product_id, "delete for unknown product");
        return Err((StatusCode::NOT_FOUND, "Produto não encontrado".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "catalog handler failure");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
