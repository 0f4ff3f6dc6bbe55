use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum KeyValueStoreError {
    #[error("storage unavailable: {message}")]
    Unavailable { message: String },

    #[error("storage write failed for {key}: {message}")]
    Write { key: String, message: String },
}

/// Durable string key-value side channel.
///
/// Values are opaque strings; callers own the encoding (JSON for structured
/// records).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError>;

    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError>;
}
