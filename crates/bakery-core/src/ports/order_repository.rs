use thiserror::Error;

use crate::domain::{Order, OrderId, OrderStatus};

#[derive(Error, Debug)]
pub enum OrderRepositoryError {
    #[error("order not found: {id}")]
    NotFound { id: OrderId },

    #[error("persistence error: {message}")]
    Storage { message: String },
}

pub trait OrderRepository: Send + Sync {
    fn create(&self, order: &mut Order) -> Result<OrderId, OrderRepositoryError>;

    fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<(), OrderRepositoryError>;

    fn attach_payment(
        &self,
        id: OrderId,
        payment_intent_id: &str,
    ) -> Result<(), OrderRepositoryError>;

    fn delete(&self, id: OrderId) -> Result<(), OrderRepositoryError>;

    fn find_by_id(&self, id: OrderId) -> Result<Order, OrderRepositoryError>;

    /// Newest first.
    fn find_all(&self) -> Result<Vec<Order>, OrderRepositoryError>;

    fn find_by_customer(&self, email: &str) -> Result<Vec<Order>, OrderRepositoryError>;

    fn find_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, OrderRepositoryError>;
}
