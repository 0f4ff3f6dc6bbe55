use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Money, ProductId};
use crate::cart::Cart;

pub type OrderId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn all() -> &'static [OrderStatus] {
        &[
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_stored(value: &str) -> Option<Self> {
        OrderStatus::all()
            .iter()
            .copied()
            .find(|status| status.as_str() == value.trim().to_lowercase())
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub address: Option<String>,
    pub date: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Money,
}

impl OrderItem {
    pub fn subtotal(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: Option<OrderId>,
    pub customer: Customer,
    pub items: Vec<OrderItem>,
    pub total: Money,
    pub status: OrderStatus,
    pub delivery: Delivery,
    pub payment_intent_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(customer: Customer, items: Vec<OrderItem>, delivery: Delivery) -> Self {
        let now = Utc::now();
        let total = items.iter().map(OrderItem::subtotal).sum();
        Self {
            id: None,
            customer,
            items,
            total,
            status: OrderStatus::Pending,
            delivery,
            payment_intent_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn from_cart(cart: &Cart, customer: Customer, delivery: Delivery) -> Self {
        let items = cart
            .lines()
            .iter()
            .map(|line| OrderItem {
                product_id: line.product_id,
                product_name: line.name.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect();
        Self::new(customer, items, delivery)
    }

    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |total, item| total.saturating_add(u64::from(item.quantity)))
    }

    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Human-readable summary sent along with the payment.
    pub fn description(&self) -> String {
        let names: Vec<String> = self
            .items
            .iter()
            .map(|item| format!("{} x{}", item.product_name, item.quantity))
            .collect();
        format!("Bakery order: {}", names.join(", "))
    }
}
