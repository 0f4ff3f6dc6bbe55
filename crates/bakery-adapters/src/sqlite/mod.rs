mod key_value_store;
mod order_repository;
mod product_repository;

pub use key_value_store::SqliteKeyValueStore;
pub use order_repository::SqliteOrderRepository;
pub use product_repository::SqliteProductRepository;
