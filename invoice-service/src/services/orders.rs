use super::database::MongoDb;
use crate::models::Order;
use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::Collection;
use service_core::error::AppError;

/// Read access to stored orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// `Ok(None)` when no order has this identifier.
    async fn find_by_id(&self, id: &str) -> Result<Option<Order>, AppError>;

    /// Succeeds when the backing store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct MongoOrderRepository {
    db: MongoDb,
    orders: Collection<Order>,
}

impl MongoOrderRepository {
    pub fn new(db: MongoDb, collection: &str) -> Self {
        let orders = db.orders(collection);
        Self { db, orders }
    }
}

/// Match hex identifiers as either an ObjectId or a plain string `_id`.
fn id_filter(id: &str) -> Document {
    match ObjectId::parse_str(id) {
        Ok(oid) => doc! { "_id": { "$in": [oid, id] } },
        Err(_) => doc! { "_id": id },
    }
}

#[async_trait]
impl OrderRepository for MongoOrderRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Order>, AppError> {
        self.orders
            .find_one(id_filter(id), None)
            .await
            .map_err(|e| {
                tracing::error!(order_id = %id, error = %e, "Failed to load order");
                AppError::from(e)
            })
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.db.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;

    #[test]
    fn test_hex_id_matches_object_id_or_string() {
        let filter = id_filter("64fabc1234567890abcdef12");
        let candidates = filter
            .get_document("_id")
            .unwrap()
            .get_array("$in")
            .unwrap();

        assert_eq!(
            candidates[0],
            Bson::ObjectId(ObjectId::parse_str("64fabc1234567890abcdef12").unwrap())
        );
        assert_eq!(candidates[1], Bson::String("64fabc1234567890abcdef12".to_string()));
    }

    #[test]
    fn test_other_ids_match_as_strings() {
        let filter = id_filter("order-42");
        assert_eq!(filter.get_str("_id").unwrap(), "order-42");
    }
}
