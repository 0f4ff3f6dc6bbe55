//! Turns a cart into a paid order.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::availability::AvailabilityTracker;
use crate::cart::Cart;
use crate::domain::{
    Currency, Customer, Delivery, Money, Order, OrderId, OrderStatus, PaymentDetails,
    PaymentIntent, PaymentLimits, PaymentStatus, PaymentValidationError,
};
use crate::ports::{OrderRepository, OrderRepositoryError, PaymentGateway, PaymentGatewayError};

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("the shop is closed")]
    ShopClosed,

    #[error("the cart is empty")]
    EmptyCart,

    #[error("invalid checkout details: {}", describe(.0))]
    Invalid(Vec<PaymentValidationError>),

    #[error("amount {amount} is outside the accepted range {min} - {max}")]
    AmountOutOfRange { amount: Money, min: Money, max: Money },

    #[error("order error: {0}")]
    Order(#[from] OrderRepositoryError),

    #[error("payment for order {order_id} failed: {source}")]
    Payment {
        order_id: OrderId,
        source: PaymentGatewayError,
    },

    #[error(
        "payment {payment_intent_id} for order {order_id} was collected but not recorded: {source}"
    )]
    PaymentNotRecorded {
        order_id: OrderId,
        payment_intent_id: String,
        source: OrderRepositoryError,
    },

    #[error("payment for order {order_id} ended as {status:?}")]
    NotCompleted {
        order_id: OrderId,
        status: PaymentStatus,
    },
}

fn describe(errors: &[PaymentValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub order_id: OrderId,
    pub payment_intent_id: String,
    pub total: Money,
    pub currency: Currency,
    pub item_count: u64,
}

pub struct CheckoutService {
    orders: Arc<dyn OrderRepository>,
    payments: Arc<dyn PaymentGateway>,
    currency: Currency,
    limits: PaymentLimits,
}

impl CheckoutService {
    pub fn new(orders: Arc<dyn OrderRepository>, payments: Arc<dyn PaymentGateway>) -> Self {
        Self {
            orders,
            payments,
            currency: Currency::default(),
            limits: PaymentLimits::default(),
        }
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_limits(mut self, limits: PaymentLimits) -> Self {
        self.limits = limits;
        self
    }

    /// On success the order is `confirmed` and the cart is cleared. When the
    /// payment fails the order is `cancelled` and the cart is left intact.
    pub async fn checkout(
        &self,
        availability: &AvailabilityTracker,
        cart: &mut Cart,
        customer: Customer,
        delivery: Delivery,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        if !availability.is_open() {
            return Err(CheckoutError::ShopClosed);
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let mut order = Order::from_cart(cart, customer, delivery);
        let mut details = self.payment_details(&order);
        details.validate().map_err(CheckoutError::Invalid)?;
        if !self.limits.allows(order.total) {
            return Err(CheckoutError::AmountOutOfRange {
                amount: order.total,
                min: self.limits.min,
                max: self.limits.max,
            });
        }

        let order_id = self.orders.create(&mut order)?;
        details.order_id = order_id;
        info!(
            order_id,
            total = %order.total,
            provider = self.payments.provider_name(),
            "order created, collecting payment"
        );

        match self.collect_payment(order_id, &details).await {
            Ok(intent) => {
                // Money has moved; the cart is spent even if recording fails.
                cart.clear();
                let attached = self.orders.attach_payment(order_id, &intent.id);
                let confirmed = self.orders.update_status(order_id, OrderStatus::Confirmed);
                if let Err(source) = attached.and(confirmed) {
                    error!(
                        order_id,
                        payment_intent_id = %intent.id,
                        error = %source,
                        "payment collected but the order could not be updated"
                    );
                    return Err(CheckoutError::PaymentNotRecorded {
                        order_id,
                        payment_intent_id: intent.id,
                        source,
                    });
                }
                info!(order_id, payment_intent_id = %intent.id, "order paid");

                Ok(CheckoutReceipt {
                    order_id,
                    payment_intent_id: intent.id,
                    total: order.total,
                    currency: self.currency,
                    item_count: order.item_count(),
                })
            }
            Err(checkout_error) => {
                warn!(order_id, error = %checkout_error, "payment failed, cancelling order");
                if let Err(update_error) =
                    self.orders.update_status(order_id, OrderStatus::Cancelled)
                {
                    error!(order_id, error = %update_error, "failed to cancel unpaid order");
                }
                Err(checkout_error)
            }
        }
    }

    fn payment_details(&self, order: &Order) -> PaymentDetails {
        PaymentDetails {
            amount: order.total,
            currency: self.currency,
            order_id: order.id.unwrap_or_default(),
            customer_email: order.customer.email.clone(),
            customer_name: order.customer.name.clone(),
            customer_phone: order.customer.phone.clone(),
            description: order.description(),
        }
    }

    async fn collect_payment(
        &self,
        order_id: OrderId,
        details: &PaymentDetails,
    ) -> Result<PaymentIntent, CheckoutError> {
        let payment_error = |source| CheckoutError::Payment { order_id, source };

        let intent = self
            .payments
            .create_payment_intent(details)
            .await
            .map_err(payment_error)?;

        let intent = match intent.status {
            PaymentStatus::Succeeded => intent,
            _ => self
                .payments
                .confirm_payment(&intent.id)
                .await
                .map_err(payment_error)?,
        };

        if intent.status != PaymentStatus::Succeeded {
            return Err(CheckoutError::NotCompleted {
                order_id,
                status: intent.status,
            });
        }

        Ok(intent)
    }
}
