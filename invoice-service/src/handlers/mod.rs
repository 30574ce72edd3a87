pub mod health;
pub mod invoice;

pub use health::{health_check, metrics_endpoint, readiness_check};
pub use invoice::{first_order_id, generate_invoice};
