use thiserror::Error;

use crate::domain::{Product, ProductId};

#[derive(Error, Debug)]
pub enum ProductRepositoryError {
    #[error("product not found: {id}")]
    NotFound { id: ProductId },

    #[error("persistence error: {message}")]
    Storage { message: String },
}

pub trait ProductRepository: Send + Sync {
    fn create(&self, product: &mut Product) -> Result<ProductId, ProductRepositoryError>;

    fn update(&self, product: &Product) -> Result<(), ProductRepositoryError>;

    fn delete(&self, id: ProductId) -> Result<(), ProductRepositoryError>;

    fn find_by_id(&self, id: ProductId) -> Result<Product, ProductRepositoryError>;

    /// Newest first.
    fn find_all(&self) -> Result<Vec<Product>, ProductRepositoryError>;

    fn find_by_category(&self, category: &str) -> Result<Vec<Product>, ProductRepositoryError>;

    fn find_popular(&self) -> Result<Vec<Product>, ProductRepositoryError>;

    fn search(&self, term: &str) -> Result<Vec<Product>, ProductRepositoryError>;

    fn categories(&self) -> Result<Vec<String>, ProductRepositoryError>;

    fn update_stock(&self, id: ProductId, stock: u32) -> Result<(), ProductRepositoryError>;
}
