mod failing_key_value_store;
mod failing_payment_gateway;
mod stub_payment_gateway;

pub use failing_key_value_store::FailingKeyValueStore;
pub use failing_payment_gateway::FailingPaymentGateway;
pub use stub_payment_gateway::StubPaymentGateway;
