use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use super::model::Cart;

/// Process-wide cart sessions, keyed by a server-issued session id. Carts
/// live for the lifetime of the process only; there is no persistence.
#[derive(Clone, Default)]
pub struct CartStore {
    inner: Arc<DashMap<Uuid, Cart>>,
}

impl CartStore {
    pub fn create_session(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.insert(id, Cart::default());
        id
    }

    pub fn get(&self, session_id: Uuid) -> Option<Cart> {
        self.inner.get(&session_id).map(|c| c.value().clone())
    }

    /// Runs a mutation against one session's cart while holding its shard
    /// lock, serializing concurrent mutations per session.
    pub fn with_cart<T>(&self, session_id: Uuid, f: impl FnOnce(&mut Cart) -> T) -> Option<T> {
        self.inner.get_mut(&session_id).map(|mut c| f(c.value_mut()))
    }

    /// Removes the session entirely. Returns false for unknown sessions.
    pub fn drop_session(&self, session_id: Uuid) -> bool {
        self.inner.remove(&session_id).is_some()
    }
}

#[cfg(test)]
mod store_tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn sessions_are_isolated() {
        let store = CartStore::default();
        let a = store.create_session();
        let b = store.create_session();

        store.with_cart(a, |cart| {
            cart.add_item(
                crate::cart::model::CartRestaurant {
                    id: Uuid::new_v4(),
                    name: "Kampeki Sushi".into(),
                    slug: "kampeki-sushi".into(),
                },
                Uuid::new_v4(),
                "Temaki".into(),
                Decimal::from(10),
                None,
                2,
            );
        });

        assert_eq!(store.get(a).unwrap().total_items(), 2);
        assert!(store.get(b).unwrap().is_empty());
    }

    #[test]
    fn unknown_session_yields_none() {
        let store = CartStore::default();
        assert!(store.get(Uuid::new_v4()).is_none());
        assert!(store.with_cart(Uuid::new_v4(), |c| c.total_items()).is_none());
    }

    #[test]
    fn dropped_session_is_gone() {
        let store = CartStore::default();
        let id = store.create_session();
        assert!(store.drop_session(id));
        assert!(store.get(id).is_none());
        assert!(!store.drop_session(id));
    }
}
