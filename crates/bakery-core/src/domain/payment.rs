use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Currency, Money, OrderId};

const MIN_NAME_LENGTH: usize = 2;
const MIN_DESCRIPTION_LENGTH: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub amount: Money,
    pub currency: Currency,
    pub order_id: OrderId,
    pub customer_email: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub description: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentValidationError {
    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    #[error("customer email is not valid: {email}")]
    InvalidEmail { email: String },

    #[error("customer name must have at least 2 characters")]
    NameTooShort,

    #[error("order description must have at least 5 characters")]
    DescriptionTooShort,
}

impl PaymentDetails {
    /// Collects every violation instead of stopping at the first one.
    pub fn validate(&self) -> Result<(), Vec<PaymentValidationError>> {
        let mut errors = Vec::new();

        if !self.amount.is_positive() {
            errors.push(PaymentValidationError::NonPositiveAmount);
        }
        if !is_valid_email(&self.customer_email) {
            errors.push(PaymentValidationError::InvalidEmail {
                email: self.customer_email.clone(),
            });
        }
        if self.customer_name.trim().chars().count() < MIN_NAME_LENGTH {
            errors.push(PaymentValidationError::NameTooShort);
        }
        if self.description.trim().chars().count() < MIN_DESCRIPTION_LENGTH {
            errors.push(PaymentValidationError::DescriptionTooShort);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// `local@domain.tld` with no whitespace anywhere.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentLimits {
    pub min: Money,
    pub max: Money,
}

impl Default for PaymentLimits {
    fn default() -> Self {
        Self {
            min: Money::from_major(1),
            max: Money::from_major(10_000),
        }
    }
}

impl PaymentLimits {
    pub fn allows(&self, amount: Money) -> bool {
        amount >= self.min && amount <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxBreakdown {
    pub net: Money,
    pub tax: Money,
    pub total: Money,
}

impl TaxBreakdown {
    pub fn for_amount(net: Money, rate_percent: u32) -> Self {
        let tax = net.percent(rate_percent);
        Self {
            net,
            tax,
            total: net + tax,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    RequiresConfirmation,
    Processing,
    Succeeded,
    Canceled,
    Failed,
}

impl PaymentStatus {
    pub fn from_stored(value: &str) -> Self {
        match value {
            "succeeded" => PaymentStatus::Succeeded,
            "processing" => PaymentStatus::Processing,
            "canceled" => PaymentStatus::Canceled,
            "requires_payment_method" | "requires_confirmation" | "requires_action" => {
                PaymentStatus::RequiresConfirmation
            }
            _ => PaymentStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
    pub status: PaymentStatus,
}

/// User-facing text for a processor decline code.
pub fn decline_message(code: &str) -> &'static str {
    match code {
        "card_declined" => "The card was declined. Check the details or try another card.",
        "expired_card" => "The card has expired. Use a valid card.",
        "incorrect_cvc" => "The CVC code is incorrect.",
        "incorrect_number" => "The card number is incorrect.",
        "invalid_expiry_month" => "The expiry month is invalid.",
        "invalid_expiry_year" => "The expiry year is invalid.",
        "insufficient_funds" => "The card has insufficient funds.",
        "processing_error" => "An error occurred while processing the card. Try again.",
        "authentication_required" => "The bank requires additional authentication.",
        _ => "The payment could not be completed.",
    }
}
