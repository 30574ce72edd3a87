use mongodb::bson::{self, Bson};
use serde::{de, de::DeserializeOwned, Deserialize, Deserializer};

/// Purchased variant of a product, as captured at checkout.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Variant {
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: Option<f64>,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub license: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[serde(default, deserialize_with = "lenient_string")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub zip_code: Option<String>,
}

/// Stored order record. Read-only for invoice generation.
///
/// Only `_id` and `amount` must be well-formed. Every other field is read
/// leniently: a value of an unexpected type becomes `None` instead of
/// failing the whole record.
///
/// `amount` is the settled total and is used as-is; it is never recomputed
/// from `quantity` and the variant price.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_document")]
    pub variant: Option<Variant>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub quantity: Option<f64>,
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient_document")]
    pub shipping_address: Option<ShippingAddress>,
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Bson::deserialize(deserializer)? {
        Bson::ObjectId(oid) => Ok(oid.to_hex()),
        Bson::String(s) => Ok(s),
        other => Err(de::Error::custom(format!(
            "unsupported identifier type: {:?}",
            other.element_type()
        ))),
    }
}

/// Scalars rendered the way they would print: ids as hex, whole doubles
/// without a fraction.
fn scalar_to_string(value: Bson) -> Option<String> {
    match value {
        Bson::String(s) => Some(s),
        Bson::ObjectId(oid) => Some(oid.to_hex()),
        Bson::Int32(n) => Some(n.to_string()),
        Bson::Int64(n) => Some(n.to_string()),
        Bson::Double(n) if n.is_finite() && n.fract() == 0.0 => Some(format!("{:.0}", n)),
        Bson::Double(n) => Some(n.to_string()),
        Bson::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_to_string(Bson::deserialize(deserializer)?))
}

// Drivers write numbers as int32, int64 or double depending on origin.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Bson::deserialize(deserializer)? {
        Bson::Int32(n) => Some(f64::from(n)),
        Bson::Int64(n) => Some(n as f64),
        Bson::Double(n) => Some(n),
        _ => None,
    })
}

fn lenient_document<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Bson::deserialize(deserializer)? {
        Bson::Document(doc) => bson::from_document(doc).ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, oid::ObjectId};

    #[test]
    fn test_order_from_stored_document() {
        let oid = ObjectId::parse_str("64fabc1234567890abcdef12").unwrap();
        let stored = doc! {
            "_id": oid,
            "userId": ObjectId::new(),
            "productId": "prod-1",
            "variant": { "price": 499.0, "type": "digital", "license": "personal" },
            "quantity": 1,
            "amount": 499,
            "shippingAddress": {
                "fullName": "Asha Rao",
                "email": "asha@example.com",
                "phone": "9999999999",
                "address": "12 MG Road",
                "city": "Bangalore",
                "state": "Karnataka",
                "country": "India",
                "zipCode": "560001",
            },
        };

        let order: Order = bson::from_document(stored).unwrap();

        assert_eq!(order.id, "64fabc1234567890abcdef12");
        assert_eq!(order.product_id.as_deref(), Some("prod-1"));
        assert_eq!(order.quantity, Some(1.0));
        assert_eq!(order.amount, 499.0);
        assert_eq!(order.variant.unwrap().kind.as_deref(), Some("digital"));
        let address = order.shipping_address.unwrap();
        assert_eq!(address.phone.as_deref(), Some("9999999999"));
        assert_eq!(address.zip_code.as_deref(), Some("560001"));
    }

    #[test]
    fn test_order_without_shipping_address() {
        let stored = doc! { "_id": "legacy-7", "quantity": 2.0, "amount": 10.5 };

        let order: Order = bson::from_document(stored).unwrap();

        assert_eq!(order.id, "legacy-7");
        assert_eq!(order.quantity, Some(2.0));
        assert!(order.shipping_address.is_none());
        assert!(order.user_id.is_none());
    }

    #[test]
    fn test_partial_variant_is_accepted() {
        let stored = doc! {
            "_id": "o1",
            "amount": 499.0,
            "variant": { "price": 499.0 },
            "shippingAddress": { "phone": "9999999999" },
        };

        let order: Order = bson::from_document(stored).unwrap();

        let variant = order.variant.unwrap();
        assert_eq!(variant.price, Some(499.0));
        assert!(variant.kind.is_none());
        assert!(variant.license.is_none());
    }

    #[test]
    fn test_numeric_address_fields_read_as_text() {
        let stored = doc! {
            "_id": "o2",
            "amount": 499.0,
            "shippingAddress": { "phone": 9999999999_i64, "zipCode": 560034 },
        };

        let order: Order = bson::from_document(stored).unwrap();

        let address = order.shipping_address.unwrap();
        assert_eq!(address.phone.as_deref(), Some("9999999999"));
        assert_eq!(address.zip_code.as_deref(), Some("560034"));
    }

    #[test]
    fn test_unused_fields_of_unexpected_shape_are_dropped() {
        let stored = doc! {
            "_id": "o3",
            "amount": 12.0,
            "quantity": 1.5,
            "userId": { "legacy": true },
            "variant": "gold",
            "shippingAddress": { "phone": "1", "city": ["a", "b"] },
        };

        let order: Order = bson::from_document(stored).unwrap();

        assert_eq!(order.quantity, Some(1.5));
        assert!(order.user_id.is_none());
        assert!(order.variant.is_none());
        let address = order.shipping_address.unwrap();
        assert_eq!(address.phone.as_deref(), Some("1"));
        assert!(address.city.is_none());
    }

    #[test]
    fn test_missing_amount_still_fails() {
        let stored = doc! { "_id": "o4", "shippingAddress": { "phone": "1" } };
        assert!(bson::from_document::<Order>(stored).is_err());
    }
}
