pub mod database;
pub mod metrics;
pub mod orders;

pub use database::MongoDb;
pub use metrics::{get_metrics, init_metrics};
pub use orders::{MongoOrderRepository, OrderRepository};
