//! Cart aggregation: one line per product, totals in minor units.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{Money, Product, ProductId};
use crate::ports::{KeyValueStore, KeyValueStoreError};

pub const CART_KEY: &str = "cart";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub unit_price: Money,
    pub quantity: u32,
    pub name: String,
    pub image: String,
    pub description: String,
}

impl CartLine {
    fn for_product(product_id: ProductId, product: &Product) -> Self {
        Self {
            product_id,
            unit_price: product.price,
            quantity: 1,
            name: product.name.clone(),
            image: product.image.clone(),
            description: product.description.clone(),
        }
    }

    pub fn subtotal(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores the cart saved under [`CART_KEY`]. Missing or unreadable
    /// snapshots give an empty cart.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let raw = match store.get(CART_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::new(),
            Err(error) => {
                warn!(%error, "failed to read saved cart, starting empty");
                return Self::new();
            }
        };

        match serde_json::from_str::<Vec<CartLine>>(&raw) {
            Ok(lines) => {
                let mut cart = Self::new();
                for line in lines.into_iter().filter(|line| line.quantity >= 1) {
                    cart.merge(line);
                }
                cart
            }
            Err(error) => {
                warn!(%error, "corrupt saved cart, starting empty");
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), KeyValueStoreError> {
        if self.lines.is_empty() {
            return store.remove(CART_KEY);
        }
        let encoded = serde_json::to_string(&self.lines).map_err(|error| {
            KeyValueStoreError::Write {
                key: CART_KEY.to_string(),
                message: error.to_string(),
            }
        })?;
        store.set(CART_KEY, &encoded)
    }

    /// Adds one unit of `product`. Products that were never persisted have no
    /// id and cannot be carted.
    pub fn add(&mut self, product: &Product) {
        let Some(product_id) = product.id else {
            warn!(name = %product.name, "cannot add a product without an id to the cart");
            return;
        };

        match self.line_mut(product_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine::for_product(product_id, product)),
        }
        debug!(product_id, "product added to cart");
    }

    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) {
        if quantity < 1 {
            self.remove(product_id);
            return;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = quantity;
        }
    }

    pub fn remove(&mut self, product_id: ProductId) {
        self.lines.retain(|line| line.product_id != product_id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all quantities. Wider than a single quantity so several
    /// maxed-out lines cannot overflow.
    pub fn total_items(&self) -> u64 {
        self.lines
            .iter()
            .fold(0u64, |total, line| total.saturating_add(u64::from(line.quantity)))
    }

    pub fn total_price(&self) -> Money {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
    }

    fn merge(&mut self, incoming: CartLine) {
        match self.line_mut(incoming.product_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(incoming.quantity),
            None => self.lines.push(incoming),
        }
    }
}
