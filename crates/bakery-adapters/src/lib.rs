//! Bakery adapters - Infrastructure implementations
//!
//! Concrete implementations of the ports defined in bakery-core:
//! SQLite persistence, an in-memory key-value store, the HTTP card
//! processor and test doubles for each of them.

pub mod memory;
pub mod payment;
pub mod sqlite;
pub mod testing;

pub use memory::InMemoryKeyValueStore;
pub use payment::HttpPaymentGateway;
pub use sqlite::{SqliteKeyValueStore, SqliteOrderRepository, SqliteProductRepository};
pub use testing::{FailingKeyValueStore, FailingPaymentGateway, StubPaymentGateway};
