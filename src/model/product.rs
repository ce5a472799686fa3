use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// A catalog entry.
///
/// Every field is optional on input, missing or `null`, so that create
/// requests may omit the id and let the service assign one. Prices keep
/// their exact decimal digits on the wire. The inventory fields are carried for
/// downstream enrichment and are never populated by this service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, deserialize_with = "null_as_default")]
    #[schema(example = "P001")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    #[schema(example = "Laptop")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::arbitrary_precision::serialize",
        deserialize_with = "price_or_zero"
    )]
    #[schema(value_type = f64, example = 1299.99)]
    pub price: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    #[schema(example = "Electronics")]
    pub category: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub in_stock: bool,
    #[serde(default)]
    pub available_quantity: Option<i32>,
    #[serde(default)]
    pub estimated_delivery: Option<String>,
    #[serde(default)]
    pub warehouse_location: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn price_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    rust_decimal::serde::arbitrary_precision_option::deserialize(deserializer)
        .map(Option::unwrap_or_default)
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            price,
            category: category.into(),
            ..Default::default()
        }
    }

    /// True when the caller left the id out (or sent only whitespace).
    pub fn has_blank_id(&self) -> bool {
        self.id.trim().is_empty()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// The catalog every process starts with.
pub fn seed_products() -> Vec<Product> {
    vec![
        Product::new(
            "P001",
            "Laptop",
            "High-performance laptop",
            Decimal::new(129999, 2),
            "Electronics",
        ),
        Product::new(
            "P002",
            "Smartphone",
            "Latest smartphone model",
            Decimal::new(79999, 2),
            "Electronics",
        ),
        Product::new(
            "P003",
            "Coffee Maker",
            "Automatic coffee machine",
            Decimal::new(12999, 2),
            "Home Appliances",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_partial_body() {
        let product: Product = serde_json::from_value(json!({
            "name": "Tablet",
            "price": 499.99,
            "category": "Electronics"
        }))
        .unwrap();

        assert!(product.has_blank_id());
        assert_eq!(product.name, "Tablet");
        assert_eq!(product.price, Decimal::new(49999, 2));
        assert_eq!(product.description, "");
        assert!(!product.in_stock);
        assert_eq!(product.available_quantity, None);
    }

    #[test]
    fn serializes_camel_case_with_explicit_nulls() {
        let value = serde_json::to_value(&seed_products()[0]).unwrap();

        assert_eq!(value["id"], "P001");
        assert_eq!(value["price"], json!(1299.99));
        assert_eq!(value["inStock"], json!(false));
        assert!(value.get("availableQuantity").unwrap().is_null());
        assert!(value.get("estimatedDelivery").unwrap().is_null());
        assert!(value.get("warehouseLocation").unwrap().is_null());
    }

    #[test]
    fn explicit_nulls_read_as_absent() {
        let product: Product = serde_json::from_value(json!({
            "id": null,
            "name": "Tablet",
            "description": null,
            "price": null,
            "category": null,
            "inStock": null,
            "availableQuantity": null
        }))
        .unwrap();

        assert!(product.has_blank_id());
        assert_eq!(product.name, "Tablet");
        assert_eq!(product.description, "");
        assert_eq!(product.price, Decimal::ZERO);
        assert_eq!(product.category, "");
        assert!(!product.in_stock);
    }

    #[test]
    fn price_keeps_every_digit() {
        let body = r#"{"id":"P9","name":"Yacht","price":12345678901234567.89}"#;
        let product: Product = serde_json::from_str(body).unwrap();
        assert_eq!(product.price, "12345678901234567.89".parse::<Decimal>().unwrap());

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["price"].to_string(), "12345678901234567.89");
    }

    #[test]
    fn whitespace_id_counts_as_blank() {
        let product = Product::default().with_id("   ");
        assert!(product.has_blank_id());
        assert!(!product.with_id("P9").has_blank_id());
    }
}
