use anyhow::Context;
use axum::http::StatusCode;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::{hours, settings, state::AppState, tenants};

use super::dto::CheckoutRequest;
use super::repo::{self, Order, OrderItem};

/// Order lifecycle. Transitions are validated; delivered and cancelled
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Received,
    Preparing,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Received => "received",
            OrderStatus::Preparing => "preparing",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn can_transition(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Received, Preparing)
                | (Received, Cancelled)
                | (Preparing, OutForDelivery)
                | (Preparing, Delivered) // pickup orders skip the courier leg
                | (Preparing, Cancelled)
                | (OutForDelivery, Delivered)
        )
    }
}

impl FromStr for OrderStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "received" => Ok(OrderStatus::Received),
            "preparing" => Ok(OrderStatus::Preparing),
            "out_for_delivery" => Ok(OrderStatus::OutForDelivery),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => anyhow::bail!("status desconhecido: {other:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fulfillment {
    Delivery,
    Pickup,
}

impl Fulfillment {
    pub fn as_str(self) -> &'static str {
        match self {
            Fulfillment::Delivery => "delivery",
            Fulfillment::Pickup => "pickup",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Fulfillment::Delivery => "entrega",
            Fulfillment::Pickup => "retirada",
        }
    }
}

/// Everything that can stop a checkout. Validation variants map to 4xx;
/// `Backend` is the only 500.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("Seu carrinho está vazio")]
    EmptyCart,
    #[error("Restaurante indisponível")]
    RestaurantUnavailable,
    #[error("O restaurante está fechado no momento")]
    RestaurantClosed,
    #[error("Este restaurante não oferece {0}")]
    FulfillmentUnavailable(&'static str),
    #[error("Endereço de entrega é obrigatório")]
    MissingAddress,
    #[error("Pedido mínimo de R$ {minimum} não atingido")]
    BelowMinimum { minimum: Decimal },
    #[error("Quantidade de pontos inválida")]
    InvalidPoints,
    #[error("Pontos insuficientes")]
    InsufficientPoints,
    #[error("Não foi possível concluir o pedido. Tente novamente.")]
    Backend(#[from] anyhow::Error),
}

impl CheckoutError {
    pub fn status(&self) -> StatusCode {
        match self {
            CheckoutError::RestaurantUnavailable => StatusCode::NOT_FOUND,
            CheckoutError::RestaurantClosed => StatusCode::CONFLICT,
            CheckoutError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Creates the order header, its items and the points movements in one
/// transaction; partial failure rolls everything back. The cart is only
/// cleared after commit.
pub async fn place_order(
    state: &AppState,
    customer_id: Uuid,
    req: &CheckoutRequest,
) -> Result<(Order, Vec<OrderItem>), CheckoutError> {
    let cart = state
        .carts
        .get(req.session_id)
        .filter(|c| !c.is_empty())
        .ok_or(CheckoutError::EmptyCart)?;
    let cart_restaurant = cart.restaurant.as_ref().ok_or(CheckoutError::EmptyCart)?;

    let restaurant = tenants::repo::get(&state.db, cart_restaurant.id)
        .await
        .context("load restaurant")?
        .filter(|r| r.is_active)
        .ok_or(CheckoutError::RestaurantUnavailable)?;

    match req.fulfillment {
        Fulfillment::Delivery if !restaurant.delivery_enabled => {
            return Err(CheckoutError::FulfillmentUnavailable(
                Fulfillment::Delivery.label(),
            ));
        }
        Fulfillment::Pickup if !restaurant.pickup_enabled => {
            return Err(CheckoutError::FulfillmentUnavailable(
                Fulfillment::Pickup.label(),
            ));
        }
        _ => {}
    }

    let delivery_address = match req.fulfillment {
        Fulfillment::Delivery => {
            let address = req
                .delivery_address
                .as_deref()
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .ok_or(CheckoutError::MissingAddress)?;
            Some(address.to_string())
        }
        Fulfillment::Pickup => None,
    };

    if !restaurant.is_open {
        return Err(CheckoutError::RestaurantClosed);
    }
    let schedule = settings::repo::business_hours(&state.db, restaurant.id)
        .await
        .context("load business hours")?;
    if !hours::evaluate(&schedule, OffsetDateTime::now_utc()).is_open {
        return Err(CheckoutError::RestaurantClosed);
    }

    let subtotal = cart.subtotal();
    if subtotal < restaurant.minimum_order {
        return Err(CheckoutError::BelowMinimum {
            minimum: restaurant.minimum_order,
        });
    }

    let global = settings::repo::global(&state.db)
        .await
        .context("load global settings")?;

    let requested_points = req.points_to_redeem.unwrap_or(0);
    if requested_points < 0 {
        return Err(CheckoutError::InvalidPoints);
    }

    let mut tx = state.db.begin().await.context("begin tx")?;

    if requested_points > 0 {
        // Checked inside the transaction, under the customer's lock; a
        // pool-side read could pass for two racing checkouts at once.
        let balance = repo::points_balance_locked(&mut tx, customer_id)
            .await
            .context("load points balance")?;
        ensure_redeemable(requested_points, balance)?;
    }

    let points_redeemed = cap_redeem(subtotal, global.points_redeem_value, requested_points);
    let discount = global.points_redeem_value * Decimal::from(points_redeemed);
    let total = subtotal - discount;
    let points_earned = points_earned(total, global.points_earn_per_currency);

    let order = Order {
        id: Uuid::new_v4(),
        restaurant_id: restaurant.id,
        customer_id,
        customer_name: req.customer_name.trim().to_string(),
        customer_phone: req.customer_phone.trim().to_string(),
        fulfillment: req.fulfillment.as_str().to_string(),
        delivery_address,
        status: OrderStatus::Received.as_str().to_string(),
        subtotal,
        discount,
        total,
        points_redeemed,
        points_earned,
        created_at: OffsetDateTime::now_utc(),
    };

    let items: Vec<OrderItem> = cart
        .lines
        .iter()
        .map(|line| OrderItem {
            id: Uuid::new_v4(),
            order_id: order.id,
            product_id: line.product_id,
            product_name: line.name.clone(),
            unit_price: line.unit_price,
            quantity: line.quantity,
        })
        .collect();

    repo::insert_order_tx(&mut tx, &order).await?;
    for item in &items {
        repo::insert_item_tx(&mut tx, item).await?;
    }
    if points_redeemed > 0 {
        repo::insert_points_tx(&mut tx, customer_id, Some(order.id), -points_redeemed, "resgate")
            .await?;
    }
    if points_earned > 0 {
        repo::insert_points_tx(&mut tx, customer_id, Some(order.id), points_earned, "pedido")
            .await?;
    }
    tx.commit().await.context("commit tx")?;

    state.carts.with_cart(req.session_id, |c| c.clear());

    info!(
        order_id = %order.id,
        restaurant_id = %restaurant.id,
        %customer_id,
        total = %order.total,
        "order placed"
    );
    Ok((order, items))
}

fn ensure_redeemable(requested: i64, balance: i64) -> Result<(), CheckoutError> {
    if requested > balance {
        return Err(CheckoutError::InsufficientPoints);
    }
    Ok(())
}

/// Never redeem more than the subtotal covers.
fn cap_redeem(subtotal: Decimal, point_value: Decimal, requested: i64) -> i64 {
    if requested <= 0 || point_value <= Decimal::ZERO {
        return 0;
    }
    let max_points = (subtotal / point_value).trunc().to_i64().unwrap_or(0);
    requested.min(max_points)
}

/// Points accrue per whole currency unit of the amount actually charged.
fn points_earned(total: Decimal, earn_per_currency: i64) -> i64 {
    if earn_per_currency <= 0 {
        return 0;
    }
    total.trunc().to_i64().unwrap_or(0) * earn_per_currency
}

#[cfg(test)]
mod checkout_tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn status_transitions() {
        use OrderStatus::*;
        assert!(Received.can_transition(Preparing));
        assert!(Received.can_transition(Cancelled));
        assert!(Preparing.can_transition(OutForDelivery));
        assert!(Preparing.can_transition(Delivered));
        assert!(OutForDelivery.can_transition(Delivered));

        assert!(!Received.can_transition(Delivered));
        assert!(!Delivered.can_transition(Preparing));
        assert!(!Cancelled.can_transition(Received));
        assert!(!OutForDelivery.can_transition(Cancelled));
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            OrderStatus::Received,
            OrderStatus::Preparing,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn redeem_never_exceeds_the_balance() {
        assert!(ensure_redeemable(100, 100).is_ok());
        assert!(ensure_redeemable(0, 0).is_ok());
        assert!(matches!(
            ensure_redeemable(100, 99),
            Err(CheckoutError::InsufficientPoints)
        ));
    }

    #[test]
    fn redeem_is_capped_by_subtotal() {
        // 30.00 subtotal at 0.01 per point covers at most 3000 points.
        assert_eq!(cap_redeem(dec("30.00"), dec("0.01"), 5000), 3000);
        assert_eq!(cap_redeem(dec("30.00"), dec("0.01"), 1000), 1000);
        assert_eq!(cap_redeem(dec("30.00"), dec("0.01"), 0), 0);
        assert_eq!(cap_redeem(dec("30.00"), Decimal::ZERO, 1000), 0);
    }

    #[test]
    fn earned_points_use_the_whole_currency_part() {
        assert_eq!(points_earned(dec("49.90"), 1), 49);
        assert_eq!(points_earned(dec("49.90"), 2), 98);
        assert_eq!(points_earned(dec("0.99"), 1), 0);
        assert_eq!(points_earned(dec("10.00"), 0), 0);
    }

    #[test]
    fn checkout_error_statuses() {
        assert_eq!(CheckoutError::EmptyCart.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            CheckoutError::RestaurantUnavailable.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CheckoutError::RestaurantClosed.status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            CheckoutError::Backend(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn below_minimum_message_names_the_amount() {
        let err = CheckoutError::BelowMinimum {
            minimum: dec("25.00"),
        };
        assert_eq!(err.to_string(), "Pedido mínimo de R$ 25.00 não atingido");
    }
}
