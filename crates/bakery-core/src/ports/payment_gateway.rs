use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{PaymentDetails, PaymentIntent};

#[derive(Error, Debug, Clone)]
pub enum PaymentGatewayError {
    #[error("network error: {message}")]
    Network { message: String },

    #[error("payment provider authentication failed")]
    Authentication,

    #[error("rate limit reached, retry in {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    #[error("card declined: {code}")]
    CardDeclined { code: String },

    #[error("parse error: {message}")]
    Parse { message: String },

    #[error("payment provider not configured: {provider}")]
    NotConfigured { provider: String },
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment_intent(
        &self,
        details: &PaymentDetails,
    ) -> Result<PaymentIntent, PaymentGatewayError>;

    async fn confirm_payment(&self, intent_id: &str)
        -> Result<PaymentIntent, PaymentGatewayError>;

    fn provider_name(&self) -> &'static str;
}
