use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::{Cart, CartLine, CartRestaurant};

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
}

/// Cart plus its derived totals, as served to the UI.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub restaurant: Option<CartRestaurant>,
    pub lines: Vec<CartLine>,
    pub subtotal: Decimal,
    pub total_items: i32,
}

impl From<Cart> for CartView {
    fn from(cart: Cart) -> Self {
        let subtotal = cart.subtotal();
        let total_items = cart.total_items();
        Self {
            restaurant: cart.restaurant,
            lines: cart.lines,
            subtotal,
            total_items,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Serialize)]
pub struct AddItemResponse {
    pub line_id: Uuid,
    pub cart_switched: bool,
    pub cart: CartView,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}
