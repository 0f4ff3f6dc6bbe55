mod key_value_store;
mod order_repository;
mod payment_gateway;
mod product_repository;

pub use key_value_store::{KeyValueStore, KeyValueStoreError};
pub use order_repository::{OrderRepository, OrderRepositoryError};
pub use payment_gateway::{PaymentGateway, PaymentGatewayError};
pub use product_repository::{ProductRepository, ProductRepositoryError};
