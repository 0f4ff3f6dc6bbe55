mod dto;
mod gateway;

pub use gateway::{HttpPaymentGateway, DEFAULT_BASE_URL};
