use bakery_core::{PaymentDetails, PaymentIntent, PaymentStatus};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct PaymentIntentResponse {
    pub id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    pub status: String,
}

impl PaymentIntentResponse {
    pub fn into_payment_intent(self) -> PaymentIntent {
        PaymentIntent {
            status: PaymentStatus::from_stored(&self.status),
            client_secret: self.client_secret.unwrap_or_default(),
            id: self.id,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct ErrorEnvelope {
    pub error: ProviderError,
}

#[derive(Deserialize, Debug)]
pub struct ProviderError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub decline_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ProviderError {
    /// The most specific reason the provider gave for a refused card.
    pub fn reason(&self) -> String {
        self.decline_code
            .clone()
            .or_else(|| self.code.clone())
            .unwrap_or_else(|| "card_declined".to_string())
    }
}

/// Form body for intent creation. Amounts go over the wire in minor units.
pub fn payment_intent_form(details: &PaymentDetails) -> Vec<(&'static str, String)> {
    let mut form = vec![
        ("amount", details.amount.minor_units().to_string()),
        ("currency", details.currency.processor_code().to_string()),
        ("description", details.description.clone()),
        ("receipt_email", details.customer_email.clone()),
        ("metadata[order_id]", details.order_id.to_string()),
        ("metadata[customer_name]", details.customer_name.clone()),
    ];
    if let Some(phone) = &details.customer_phone {
        form.push(("metadata[customer_phone]", phone.clone()));
    }
    form
}

#[cfg(test)]
mod tests {
    use super::*;
    use bakery_core::{Currency, Money};

    #[test]
    fn response_maps_provider_status() {
        let response: PaymentIntentResponse = serde_json::from_str(
            r#"{"id":"pi_1","client_secret":"pi_1_secret_x","status":"requires_payment_method","amount":9000}"#,
        )
        .unwrap();

        let intent = response.into_payment_intent();

        assert_eq!(intent.id, "pi_1");
        assert_eq!(intent.client_secret, "pi_1_secret_x");
        assert_eq!(intent.status, PaymentStatus::RequiresConfirmation);
    }

    #[test]
    fn missing_client_secret_is_empty() {
        let response: PaymentIntentResponse =
            serde_json::from_str(r#"{"id":"pi_2","status":"succeeded"}"#).unwrap();

        let intent = response.into_payment_intent();

        assert!(intent.client_secret.is_empty());
        assert_eq!(intent.status, PaymentStatus::Succeeded);
    }

    #[test]
    fn decline_code_preferred_over_generic_code() {
        let envelope: ErrorEnvelope = serde_json::from_str(
            r#"{"error":{"type":"card_error","code":"card_declined","decline_code":"insufficient_funds","message":"Your card has insufficient funds."}}"#,
        )
        .unwrap();

        assert_eq!(envelope.error.reason(), "insufficient_funds");
    }

    #[test]
    fn form_carries_minor_units_and_lowercase_currency() {
        let details = PaymentDetails {
            amount: Money::from_major(90),
            currency: Currency::Ron,
            order_id: 12,
            customer_email: "ana@example.com".to_string(),
            customer_name: "Ana Popescu".to_string(),
            customer_phone: None,
            description: "Bakery order: Cozonac x2".to_string(),
        };

        let form = payment_intent_form(&details);

        assert!(form.contains(&("amount", "9000".to_string())));
        assert!(form.contains(&("currency", "ron".to_string())));
        assert!(form.contains(&("metadata[order_id]", "12".to_string())));
        assert!(!form.iter().any(|(key, _)| *key == "metadata[customer_phone]"));
    }
}
