use async_trait::async_trait;
use bakery_core::{
    PaymentDetails, PaymentGateway, PaymentGatewayError, PaymentIntent, PaymentStatus,
};
use std::sync::Mutex;

/// Accepts every payment and records what it was asked to charge.
pub struct StubPaymentGateway {
    created_status: PaymentStatus,
    confirmed_status: PaymentStatus,
    charged: Mutex<Vec<PaymentDetails>>,
    confirmed: Mutex<Vec<String>>,
}

impl StubPaymentGateway {
    pub fn new() -> Self {
        Self {
            created_status: PaymentStatus::RequiresConfirmation,
            confirmed_status: PaymentStatus::Succeeded,
            charged: Mutex::new(Vec::new()),
            confirmed: Mutex::new(Vec::new()),
        }
    }

    /// Intents come back already settled, so no confirmation is needed.
    pub fn succeeding_immediately() -> Self {
        Self {
            created_status: PaymentStatus::Succeeded,
            ..Self::new()
        }
    }

    pub fn confirming_with(status: PaymentStatus) -> Self {
        Self {
            confirmed_status: status,
            ..Self::new()
        }
    }

    pub fn charged(&self) -> Vec<PaymentDetails> {
        self.charged.lock().unwrap().clone()
    }

    pub fn confirmed(&self) -> Vec<String> {
        self.confirmed.lock().unwrap().clone()
    }
}

impl Default for StubPaymentGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentGateway for StubPaymentGateway {
    async fn create_payment_intent(
        &self,
        details: &PaymentDetails,
    ) -> Result<PaymentIntent, PaymentGatewayError> {
        let mut charged = self.charged.lock().unwrap();
        charged.push(details.clone());
        let id = format!("pi_stub_{}", charged.len());

        Ok(PaymentIntent {
            client_secret: format!("{}_secret", id),
            id,
            status: self.created_status,
        })
    }

    async fn confirm_payment(&self, intent_id: &str) -> Result<PaymentIntent, PaymentGatewayError> {
        self.confirmed.lock().unwrap().push(intent_id.to_string());

        Ok(PaymentIntent {
            id: intent_id.to_string(),
            client_secret: format!("{}_secret", intent_id),
            status: self.confirmed_status,
        })
    }

    fn provider_name(&self) -> &'static str {
        "Stub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bakery_core::{Currency, Money};

    fn details(order_id: i64) -> PaymentDetails {
        PaymentDetails {
            amount: Money::from_major(120),
            currency: Currency::Ron,
            order_id,
            customer_email: "ana@example.com".to_string(),
            customer_name: "Ana".to_string(),
            customer_phone: None,
            description: "Bakery order: Tort x1".to_string(),
        }
    }

    #[tokio::test]
    async fn records_each_charge_with_distinct_ids() {
        let gateway = StubPaymentGateway::new();

        let first = gateway.create_payment_intent(&details(1)).await.unwrap();
        let second = gateway.create_payment_intent(&details(2)).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.status, PaymentStatus::RequiresConfirmation);
        assert_eq!(gateway.charged().len(), 2);
        assert_eq!(gateway.charged()[1].order_id, 2);
    }

    #[tokio::test]
    async fn confirmation_uses_configured_status() {
        let gateway = StubPaymentGateway::confirming_with(PaymentStatus::Processing);

        let intent = gateway.confirm_payment("pi_9").await.unwrap();

        assert_eq!(intent.status, PaymentStatus::Processing);
        assert_eq!(gateway.confirmed(), vec!["pi_9".to_string()]);
    }
}
