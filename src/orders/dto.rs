use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo::{Order, OrderItem};
use super::services::{Fulfillment, OrderStatus};

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    /// Cart session the order is built from.
    pub session_id: Uuid,
    pub customer_name: String,
    pub customer_phone: String,
    pub fulfillment: Fulfillment,
    pub delivery_address: Option<String>,
    pub points_to_redeem: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}
