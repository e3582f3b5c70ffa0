use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// The restaurant a cart is currently scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartRestaurant {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// One line of the cart. The line id is synthetic; prices are snapshotted
/// server-side when the line is created.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub line_id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub unit_price: Decimal,
    pub image_url: Option<String>,
    pub quantity: i32,
}

/// In-memory cart, scoped to a single restaurant at a time. All mutations
/// are synchronous; totals are recomputed on read.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Cart {
    pub restaurant: Option<CartRestaurant>,
    pub lines: Vec<CartLine>,
}

#[derive(Debug, Clone, Copy)]
pub struct AddOutcome {
    pub line_id: Uuid,
    /// True when the cart was cleared because the item came from a
    /// different restaurant than the current contents.
    pub cart_switched: bool,
}

impl Cart {
    /// Adds a product. Re-adding a product already in the cart merges
    /// quantities into the existing line and refreshes its snapshot, so
    /// the whole line carries the price the catalog reported for this
    /// add; adding from another restaurant clears the cart and re-scopes
    /// it (clear-and-replace).
    pub fn add_item(
        &mut self,
        restaurant: CartRestaurant,
        product_id: Uuid,
        name: String,
        unit_price: Decimal,
        image_url: Option<String>,
        quantity: i32,
    ) -> AddOutcome {
        let quantity = quantity.max(1);

        let cart_switched = match &self.restaurant {
            Some(current) if current.id != restaurant.id => {
                self.lines.clear();
                true
            }
            _ => false,
        };
        self.restaurant = Some(restaurant);

        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity += quantity;
            line.name = name;
            line.unit_price = unit_price;
            line.image_url = image_url;
            return AddOutcome {
                line_id: line.line_id,
                cart_switched,
            };
        }

        let line_id = Uuid::new_v4();
        self.lines.push(CartLine {
            line_id,
            product_id,
            name,
            unit_price,
            image_url,
            quantity,
        });
        AddOutcome {
            line_id,
            cart_switched,
        }
    }

    /// Sets a line's quantity; zero or below removes the line. Returns
    /// false when the line does not exist.
    pub fn update_quantity(&mut self, line_id: Uuid, quantity: i32) -> bool {
        if quantity <= 0 {
            return self.remove_item(line_id);
        }
        match self.lines.iter_mut().find(|l| l.line_id == line_id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub fn remove_item(&mut self, line_id: Uuid) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.line_id != line_id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.restaurant = None;
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn subtotal(&self) -> Decimal {
        self.lines
            .iter()
            .map(|l| l.unit_price * Decimal::from(l.quantity))
            .sum()
    }

    pub fn total_items(&self) -> i32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

#[cfg(test)]
mod cart_tests {
    use super::*;

    fn restaurant() -> CartRestaurant {
        CartRestaurant {
            id: Uuid::new_v4(),
            name: "Kampeki Sushi".into(),
            slug: "kampeki-sushi".into(),
        }
    }

    fn price(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn re_adding_a_product_merges_quantities() {
        let mut cart = Cart::default();
        let r = restaurant();
        let product = Uuid::new_v4();

        let first = cart.add_item(r.clone(), product, "Temaki".into(), price("10.00"), None, 2);
        let second = cart.add_item(r, product, "Temaki".into(), price("10.00"), None, 3);

        // Merge policy: one line, quantities summed.
        assert_eq!(first.line_id, second.line_id);
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 5);
        assert_eq!(cart.subtotal(), price("50.00"));
        assert_eq!(cart.total_items(), 5);
    }

    #[test]
    fn merging_takes_the_latest_price_snapshot() {
        let mut cart = Cart::default();
        let r = restaurant();
        let product = Uuid::new_v4();

        cart.add_item(r.clone(), product, "Temaki".into(), price("10.00"), None, 2);
        // The owner raised the price between adds.
        cart.add_item(r, product, "Temaki".into(), price("12.00"), None, 3);

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 5);
        assert_eq!(cart.lines[0].unit_price, price("12.00"));
        assert_eq!(cart.subtotal(), price("60.00"));
    }

    #[test]
    fn totals_track_any_sequence_of_mutations() {
        let mut cart = Cart::default();
        let r = restaurant();

        let a = cart
            .add_item(r.clone(), Uuid::new_v4(), "Uramaki".into(), price("24.90"), None, 1)
            .line_id;
        let b = cart
            .add_item(r.clone(), Uuid::new_v4(), "Hot roll".into(), price("19.50"), None, 2)
            .line_id;
        cart.add_item(r, Uuid::new_v4(), "Sunomono".into(), price("9.00"), None, 1);

        assert_eq!(cart.subtotal(), price("72.90"));
        assert_eq!(cart.total_items(), 4);

        assert!(cart.update_quantity(b, 1));
        assert_eq!(cart.subtotal(), price("53.40"));
        assert_eq!(cart.total_items(), 3);

        assert!(cart.remove_item(a));
        assert_eq!(cart.subtotal(), price("28.50"));
        assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn quantity_zero_removes_the_line() {
        let mut cart = Cart::default();
        let line = cart
            .add_item(restaurant(), Uuid::new_v4(), "Niguiri".into(), price("7.50"), None, 3)
            .line_id;

        assert!(cart.update_quantity(line, 0));
        assert!(cart.lines.iter().all(|l| l.line_id != line));
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn negative_quantity_also_removes() {
        let mut cart = Cart::default();
        let line = cart
            .add_item(restaurant(), Uuid::new_v4(), "Sashimi".into(), price("32.00"), None, 1)
            .line_id;
        assert!(cart.update_quantity(line, -2));
        assert!(cart.is_empty());
    }

    #[test]
    fn updating_unknown_line_is_a_noop() {
        let mut cart = Cart::default();
        cart.add_item(restaurant(), Uuid::new_v4(), "Temaki".into(), price("10.00"), None, 1);
        assert!(!cart.update_quantity(Uuid::new_v4(), 4));
        assert!(!cart.remove_item(Uuid::new_v4()));
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn adding_from_another_restaurant_clears_and_rescopes() {
        let mut cart = Cart::default();
        let first = restaurant();
        let second = restaurant();

        cart.add_item(first, Uuid::new_v4(), "Temaki".into(), price("10.00"), None, 2);
        let outcome = cart.add_item(
            second.clone(),
            Uuid::new_v4(),
            "Pizza margherita".into(),
            price("39.90"),
            None,
            1,
        );

        assert!(outcome.cart_switched);
        assert_eq!(cart.restaurant.as_ref().map(|r| r.id), Some(second.id));
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.subtotal(), price("39.90"));
    }

    #[test]
    fn clear_empties_everything() {
        let mut cart = Cart::default();
        cart.add_item(restaurant(), Uuid::new_v4(), "Temaki".into(), price("10.00"), None, 2);
        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.restaurant.is_none());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn add_clamps_non_positive_quantity_to_one() {
        let mut cart = Cart::default();
        cart.add_item(restaurant(), Uuid::new_v4(), "Temaki".into(), price("10.00"), None, 0);
        assert_eq!(cart.total_items(), 1);
    }
}
