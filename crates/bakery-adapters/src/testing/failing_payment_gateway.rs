use async_trait::async_trait;
use bakery_core::{PaymentDetails, PaymentGateway, PaymentGatewayError, PaymentIntent};

pub struct FailingPaymentGateway {
    error: PaymentGatewayError,
}

impl FailingPaymentGateway {
    pub fn network_error() -> Self {
        Self {
            error: PaymentGatewayError::Network {
                message: "connection refused".to_string(),
            },
        }
    }

    pub fn authentication_error() -> Self {
        Self {
            error: PaymentGatewayError::Authentication,
        }
    }

    pub fn declined(code: &str) -> Self {
        Self {
            error: PaymentGatewayError::CardDeclined {
                code: code.to_string(),
            },
        }
    }

    pub fn with_error(error: PaymentGatewayError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl PaymentGateway for FailingPaymentGateway {
    async fn create_payment_intent(
        &self,
        _details: &PaymentDetails,
    ) -> Result<PaymentIntent, PaymentGatewayError> {
        Err(self.error.clone())
    }

    async fn confirm_payment(&self, _intent_id: &str) -> Result<PaymentIntent, PaymentGatewayError> {
        Err(self.error.clone())
    }

    fn provider_name(&self) -> &'static str {
        "Failing"
    }
}
