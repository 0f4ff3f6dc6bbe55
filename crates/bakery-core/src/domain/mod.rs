mod money;
mod order;
mod payment;
mod product;
mod session;

pub use money::{Currency, Money, MoneyParseError};
pub use order::{Customer, Delivery, Order, OrderId, OrderItem, OrderStatus};
pub use payment::{
    decline_message, is_valid_email, PaymentDetails, PaymentIntent, PaymentLimits, PaymentStatus,
    PaymentValidationError, TaxBreakdown,
};
pub use product::{Product, ProductId};
pub use session::{ActiveSession, ShopSession};
