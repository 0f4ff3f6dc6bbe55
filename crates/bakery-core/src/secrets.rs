use std::path::{Path, PathBuf};
use thiserror::Error;

const SECRET_KEY_ENV: &str = "BAKERY_PAYMENT_SECRET_KEY";

#[derive(Error, Debug)]
pub enum SecretsError {
    #[error("payment secret key not found")]
    NotFound,

    #[error("failed to read secrets file: {source}")]
    Read {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse secrets.toml: {source}")]
    Parse {
        #[from]
        source: toml::de::Error,
    },
}

#[derive(Clone)]
pub struct PaymentCredentials {
    pub secret_key: String,
}

impl std::fmt::Debug for PaymentCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentCredentials")
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, serde::Deserialize)]
struct SecretsFile {
    payment: Option<PaymentSecrets>,
}

#[derive(Debug, serde::Deserialize)]
struct PaymentSecrets {
    secret_key: String,
}

/// Environment first, then `secrets.toml` next to the configuration.
pub fn resolve_payment_credentials() -> Result<PaymentCredentials, SecretsError> {
    if let Ok(secret_key) = std::env::var(SECRET_KEY_ENV) {
        if !secret_key.trim().is_empty() {
            return Ok(PaymentCredentials { secret_key });
        }
    }

    load_from_secrets_file(&secrets_path())
}

fn load_from_secrets_file(path: &Path) -> Result<PaymentCredentials, SecretsError> {
    if !path.exists() {
        return Err(SecretsError::NotFound);
    }

    let content = std::fs::read_to_string(path)?;
    let secrets: SecretsFile = toml::from_str(&content)?;

    secrets
        .payment
        .filter(|payment| !payment.secret_key.trim().is_empty())
        .map(|payment| PaymentCredentials {
            secret_key: payment.secret_key,
        })
        .ok_or(SecretsError::NotFound)
}

fn secrets_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bakery")
        .join("secrets.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn resolve_from_environment() {
        env::set_var(SECRET_KEY_ENV, "sk_test_123");

        let credentials = resolve_payment_credentials().unwrap();

        assert_eq!(credentials.secret_key, "sk_test_123");
        assert!(!format!("{:?}", credentials).contains("sk_test_123"));

        env::remove_var(SECRET_KEY_ENV);
    }

    #[test]
    fn missing_secrets_file_is_not_found() {
        let path = PathBuf::from("/nonexistent/bakery/secrets.toml");

        assert!(matches!(
            load_from_secrets_file(&path),
            Err(SecretsError::NotFound)
        ));
    }
}
