use async_trait::async_trait;
use bakery_core::{PaymentDetails, PaymentGateway, PaymentGatewayError, PaymentIntent};

use super::dto::{payment_intent_form, ErrorEnvelope, PaymentIntentResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.stripe.com";

const DEFAULT_RETRY_AFTER_SECONDS: u64 = 60;

/// Card processor reached over its REST API with a bearer secret key.
#[derive(Clone)]
pub struct HttpPaymentGateway {
    base_url: String,
    secret_key: String,
}

impl HttpPaymentGateway {
    pub fn new(base_url: String, secret_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            secret_key,
        }
    }

    fn create_intent_blocking(
        &self,
        details: &PaymentDetails,
    ) -> Result<PaymentIntent, PaymentGatewayError> {
        let url = format!("{}/v1/payment_intents", self.base_url);
        let form = payment_intent_form(details);
        let fields: Vec<(&str, &str)> = form
            .iter()
            .map(|(key, value)| (*key, value.as_str()))
            .collect();

        let response = ureq::post(&url)
            .set("Authorization", &format!("Bearer {}", self.secret_key))
            .set("Idempotency-Key", &format!("order-{}", details.order_id))
            .send_form(&fields)
            .map_err(|error| self.handle_error(error))?;

        response
            .into_json::<PaymentIntentResponse>()
            .map(PaymentIntentResponse::into_payment_intent)
            .map_err(|error| PaymentGatewayError::Parse {
                message: error.to_string(),
            })
    }

    fn confirm_blocking(&self, intent_id: &str) -> Result<PaymentIntent, PaymentGatewayError> {
        let url = format!("{}/v1/payment_intents/{}/confirm", self.base_url, intent_id);

        let response = ureq::post(&url)
            .set("Authorization", &format!("Bearer {}", self.secret_key))
            .send_form(&[])
            .map_err(|error| self.handle_error(error))?;

        response
            .into_json::<PaymentIntentResponse>()
            .map(PaymentIntentResponse::into_payment_intent)
            .map_err(|error| PaymentGatewayError::Parse {
                message: error.to_string(),
            })
    }

    fn handle_error(&self, error: ureq::Error) -> PaymentGatewayError {
        match error {
            ureq::Error::Status(401, _) | ureq::Error::Status(403, _) => {
                PaymentGatewayError::Authentication
            }
            ureq::Error::Status(402, response) => {
                let code = response
                    .into_json::<ErrorEnvelope>()
                    .map(|envelope| envelope.error.reason())
                    .unwrap_or_else(|_| "card_declined".to_string());
                PaymentGatewayError::CardDeclined { code }
            }
            ureq::Error::Status(429, response) => PaymentGatewayError::RateLimited {
                retry_after: response
                    .header("Retry-After")
                    .and_then(|value| value.trim().parse().ok())
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECONDS),
            },
            ureq::Error::Status(code, response) => {
                let status_text = response.status_text().to_string();
                let detail = response
                    .into_json::<ErrorEnvelope>()
                    .ok()
                    .and_then(|envelope| envelope.error.message);
                PaymentGatewayError::Network {
                    message: match detail {
                        Some(detail) => format!("HTTP {}: {}", code, detail),
                        None => format!("HTTP {}: {}", code, status_text),
                    },
                }
            }
            ureq::Error::Transport(transport) => PaymentGatewayError::Network {
                message: transport.to_string(),
            },
        }
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_payment_intent(
        &self,
        details: &PaymentDetails,
    ) -> Result<PaymentIntent, PaymentGatewayError> {
        let gateway = self.clone();
        let details = details.clone();

        let intent = tokio::task::spawn_blocking(move || gateway.create_intent_blocking(&details))
            .await
            .map_err(|error| PaymentGatewayError::Network {
                message: format!("task join error: {}", error),
            })??;

        tracing::debug!(
            intent_id = %intent.id,
            status = ?intent.status,
            "created payment intent"
        );

        Ok(intent)
    }

    async fn confirm_payment(&self, intent_id: &str) -> Result<PaymentIntent, PaymentGatewayError> {
        let gateway = self.clone();
        let intent_id = intent_id.to_string();

        let intent = tokio::task::spawn_blocking(move || gateway.confirm_blocking(&intent_id))
            .await
            .map_err(|error| PaymentGatewayError::Network {
                message: format!("task join error: {}", error),
            })??;

        tracing::debug!(
            intent_id = %intent.id,
            status = ?intent.status,
            "confirmed payment intent"
        );

        Ok(intent)
    }

    fn provider_name(&self) -> &'static str {
        "Stripe"
    }
}
