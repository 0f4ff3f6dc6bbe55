use std::sync::Arc;

use anyhow::{Context, Result};
use bakery_adapters::payment::DEFAULT_BASE_URL;
use bakery_adapters::HttpPaymentGateway;
use bakery_core::{
    decline_message, resolve_payment_credentials, CheckoutError, CheckoutService, Customer,
    Delivery, PaymentGatewayError, SecretsError,
};

use crate::storage::Storage;
use crate::CheckoutArgs;

pub async fn execute(args: CheckoutArgs) -> Result<()> {
    let storage = Storage::open()?;
    let tracker = storage.availability();
    let mut cart = storage.cart();

    let gateway = build_gateway(&storage)?;
    let service = CheckoutService::new(storage.orders.clone(), Arc::new(gateway))
        .with_currency(storage.config.shop.currency)
        .with_limits(storage.config.payment.limits());

    let customer = Customer {
        name: args.name.trim().to_string(),
        email: args.email.trim().to_string(),
        phone: non_empty(args.phone),
    };
    let delivery = Delivery {
        address: non_empty(args.address),
        date: non_empty(args.date),
        notes: non_empty(args.notes),
    };

    let result = service.checkout(&tracker, &mut cart, customer, delivery).await;
    if matches!(result, Ok(_) | Err(CheckoutError::PaymentNotRecorded { .. })) {
        storage.save_cart(&cart)?;
    }

    match result {
        Ok(receipt) => {
            println!(
                "Order #{} confirmed: {} items, {} paid.",
                receipt.order_id,
                receipt.item_count,
                receipt.currency.format(receipt.total)
            );
            println!("Payment reference: {}", receipt.payment_intent_id);
            Ok(())
        }
        Err(error) => Err(explain(error)),
    }
}

fn build_gateway(storage: &Storage) -> Result<HttpPaymentGateway> {
    let credentials = match resolve_payment_credentials() {
        Ok(credentials) => credentials,
        Err(SecretsError::NotFound) => {
            return Err(PaymentGatewayError::NotConfigured {
                provider: "Stripe".to_string(),
            }
            .into())
        }
        Err(error) => return Err(error).context("cannot read payment secrets"),
    };

    let base_url = storage
        .config
        .payment
        .base_url
        .clone()
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    Ok(HttpPaymentGateway::new(base_url, credentials.secret_key))
}

fn explain(error: CheckoutError) -> anyhow::Error {
    match error {
        CheckoutError::ShopClosed => {
            anyhow::anyhow!("the shop is closed; orders are accepted once it opens again")
        }
        CheckoutError::EmptyCart => anyhow::anyhow!("the cart is empty"),
        CheckoutError::Payment {
            order_id,
            source: PaymentGatewayError::CardDeclined { code },
        } => anyhow::anyhow!(
            "order #{} was cancelled: {} ({})",
            order_id,
            decline_message(&code),
            code
        ),
        CheckoutError::PaymentNotRecorded {
            order_id,
            payment_intent_id,
            source,
        } => anyhow::anyhow!(
            "payment {} was collected for order #{} but could not be recorded ({}); do not pay again, set the order status by hand",
            payment_intent_id,
            order_id,
            source
        ),
        other => other.into(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bakery_core::OrderRepositoryError;

    #[test]
    fn blank_optional_fields_are_dropped() {
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(non_empty(None), None);
        assert_eq!(
            non_empty(Some(" Strada Florilor 3 ".to_string())),
            Some("Strada Florilor 3".to_string())
        );
    }

    #[test]
    fn declined_cards_get_a_readable_reason() {
        let error = explain(CheckoutError::Payment {
            order_id: 4,
            source: PaymentGatewayError::CardDeclined {
                code: "expired_card".to_string(),
            },
        });

        let message = error.to_string();
        assert!(message.contains("order #4"));
        assert!(message.contains("The card has expired"));
    }

    #[test]
    fn unrecorded_payment_warns_against_paying_twice() {
        let error = explain(CheckoutError::PaymentNotRecorded {
            order_id: 9,
            payment_intent_id: "pi_42".to_string(),
            source: OrderRepositoryError::Storage {
                message: "database is locked".to_string(),
            },
        });

        let message = error.to_string();
        assert!(message.contains("pi_42"));
        assert!(message.contains("order #9"));
        assert!(message.contains("do not pay again"));
    }
}
