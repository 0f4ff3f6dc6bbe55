//! Bakery core library
//!
//! Domain types, port definitions (traits) and the storefront services:
//! shop availability tracking, cart aggregation and checkout.
//! This crate has no knowledge of infrastructure concerns.

pub mod availability;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod domain;
pub mod ports;
pub mod secrets;

pub use availability::{AvailabilityError, AvailabilityState, AvailabilityTracker, Transition};
pub use cart::{Cart, CartLine};
pub use checkout::{CheckoutError, CheckoutReceipt, CheckoutService};
pub use config::{Config, ConfigError, PaymentConfig, ShopConfig, StorageConfig};
pub use domain::{
    decline_message, is_valid_email, ActiveSession, Currency, Customer, Delivery, Money,
    MoneyParseError, Order, OrderId, OrderItem, OrderStatus, PaymentDetails, PaymentIntent,
    PaymentLimits, PaymentStatus, PaymentValidationError, Product, ProductId, ShopSession,
    TaxBreakdown,
};
pub use ports::{
    KeyValueStore, KeyValueStoreError, OrderRepository, OrderRepositoryError, PaymentGateway,
    PaymentGatewayError, ProductRepository, ProductRepositoryError,
};
pub use secrets::{resolve_payment_credentials, PaymentCredentials, SecretsError};
