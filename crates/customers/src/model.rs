//! Customer shapes on both sides of the pipeline.

use serde::{Deserialize, Serialize};

/// Billing block nested inside a source customer. Every field is
/// optional on the wire and defaults to an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingInfo {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address_1: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub country: String,
}

/// A customer as fetched from the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCustomer {
    pub id: u64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub billing: BillingInfo,
}

/// A customer in the destination system's flat shape.
///
/// Missing optional fields map to empty strings rather than omitted
/// keys, so the output shape is stable for downstream consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationCustomer {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub zip: String,
    pub country_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_billing_block_defaults_to_empty() {
        let customer: SourceCustomer = serde_json::from_str(
            r#"{"id": 5, "email": "a@b.co", "first_name": "Ada", "last_name": "Byron"}"#,
        )
        .unwrap();

        assert_eq!(customer.billing, BillingInfo::default());
        assert_eq!(customer.billing.phone, "");
    }
}
