use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use bakery_adapters::{SqliteKeyValueStore, SqliteOrderRepository, SqliteProductRepository};
use bakery_core::{AvailabilityTracker, Cart, Config, KeyValueStore};

/// Everything a command needs, backed by one SQLite file.
pub struct Storage {
    pub config: Config,
    pub store: Arc<dyn KeyValueStore>,
    pub products: SqliteProductRepository,
    pub orders: Arc<SqliteOrderRepository>,
}

impl Storage {
    pub fn open() -> Result<Self> {
        let config = Config::load().context("failed to load configuration")?;
        let database_path = config.database_path();

        if let Some(parent) = database_path.parent() {
            fs::create_dir_all(parent).context("cannot create data directory")?;
        }
        tracing::debug!(path = ?database_path, "opening storefront database");

        let store = SqliteKeyValueStore::new(&database_path).context("database access error")?;
        let products =
            SqliteProductRepository::new(&database_path).context("database access error")?;
        let orders = SqliteOrderRepository::new(&database_path).context("database access error")?;

        Ok(Self {
            config,
            store: Arc::new(store),
            products,
            orders: Arc::new(orders),
        })
    }

    pub fn availability(&self) -> AvailabilityTracker {
        AvailabilityTracker::load(self.store.clone())
    }

    pub fn cart(&self) -> Cart {
        Cart::load(self.store.as_ref())
    }

    pub fn save_cart(&self, cart: &Cart) -> Result<()> {
        cart.save(self.store.as_ref()).context("failed to save cart")
    }
}
