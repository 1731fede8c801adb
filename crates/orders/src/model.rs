//! Order shapes on both sides of the pipeline.
//!
//! Source records come off the shop API as-is; the shop serializes
//! monetary amounts sometimes as JSON numbers and sometimes as strings,
//! so amounts go through a coercing deserializer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One line of a source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceLineItem {
    #[serde(default)]
    pub product_id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: i64,
    /// Unit price.
    #[serde(default, deserialize_with = "de_amount")]
    pub price: f64,
    /// Line total as declared by the shop.
    #[serde(default, deserialize_with = "de_amount")]
    pub total: f64,
}

/// A sales order as fetched from the shop, read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceOrder {
    pub id: u64,
    #[serde(default)]
    pub customer_id: u64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub currency: String,
    /// Declared order total. Must match the line-total sum within 0.01.
    #[serde(default, deserialize_with = "de_amount")]
    pub total: f64,
    #[serde(default)]
    pub line_items: Vec<SourceLineItem>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl SourceOrder {
    /// Sum of the declared line totals.
    pub fn line_total_sum(&self) -> f64 {
        self.line_items.iter().map(|l| l.total).sum()
    }
}

/// One line entry in the destination shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationLine {
    pub product_ref: String,
    pub quantity: i64,
    pub unit_price: f64,
}

/// An order in the destination system's shape.
///
/// Produced fresh by the transformer for each submission; the declared
/// total is not carried, the destination recomputes it from the lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationOrder {
    pub partner_ref: String,
    pub lines: Vec<DestinationLine>,
}

/// Accept a monetary amount as a JSON number or a numeric string.
fn de_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    struct AmountVisitor;

    impl serde::de::Visitor<'_> for AmountVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            f.write_str("a number or a numeric string")
        }

        fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<f64, E> {
            v.trim().parse::<f64>().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(AmountVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_deserialize_from_strings_and_numbers() {
        let order: SourceOrder = serde_json::from_str(
            r#"{
                "id": 42,
                "customer_id": 7,
                "status": "processing",
                "currency": "EUR",
                "total": "20.00",
                "line_items": [
                    {"product_id": 1, "quantity": 2, "price": 10.0, "total": "20.00"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(order.total, 20.0);
        assert_eq!(order.line_items[0].price, 10.0);
        assert_eq!(order.line_items[0].total, 20.0);
        assert_eq!(order.created_at, None);
    }

    #[test]
    fn missing_optional_fields_default() {
        let order: SourceOrder = serde_json::from_str(
            r#"{"id": 2, "customer_id": 1, "total": 99.0, "line_items": [{"total": 20.0}]}"#,
        )
        .unwrap();

        assert_eq!(order.status, "");
        assert_eq!(order.line_items[0].product_id, 0);
        assert_eq!(order.line_items[0].quantity, 0);
        assert_eq!(order.line_items[0].price, 0.0);
    }

    #[test]
    fn line_total_sum_adds_all_lines() {
        let order = SourceOrder {
            id: 1,
            customer_id: 1,
            status: "processing".into(),
            currency: "EUR".into(),
            total: 30.0,
            line_items: vec![
                SourceLineItem {
                    product_id: 1,
                    name: "widget".into(),
                    quantity: 2,
                    price: 10.0,
                    total: 20.0,
                },
                SourceLineItem {
                    product_id: 2,
                    name: "gadget".into(),
                    quantity: 1,
                    price: 10.0,
                    total: 10.0,
                },
            ],
            created_at: None,
        };

        assert_eq!(order.line_total_sum(), 30.0);
    }
}
