//! Order validation.
//!
//! Rules run in order; the first failure wins. Validation never mutates
//! its input.

use storesync_core::{SyncError, SyncResult};

use crate::model::SourceOrder;

/// Rounding tolerance when comparing the declared total against the
/// line-total sum (0.01 currency unit).
pub const AMOUNT_EPSILON: f64 = 0.01;

/// Validate a source order before transformation.
///
/// 1. Required fields present: id, customer reference, at least one line.
/// 2. Declared total matches the sum of line totals within 0.01.
pub fn validate_order(order: &SourceOrder) -> SyncResult<()> {
    let mut missing = Vec::new();
    if order.id == 0 {
        missing.push("id");
    }
    if order.customer_id == 0 {
        missing.push("customer_id");
    }
    if order.line_items.is_empty() {
        missing.push("line_items");
    }
    if !missing.is_empty() {
        return Err(SyncError::validation(format!(
            "missing required order fields: {}",
            missing.join(", ")
        )));
    }

    let line_sum = order.line_total_sum();
    if (order.total - line_sum).abs() > AMOUNT_EPSILON {
        return Err(SyncError::validation(format!(
            "order total {} does not match line total sum {}",
            order.total, line_sum
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceLineItem;
    use proptest::prelude::*;

    fn order_with(total: f64, line_totals: &[f64]) -> SourceOrder {
        SourceOrder {
            id: 1,
            customer_id: 1,
            status: "processing".into(),
            currency: "EUR".into(),
            total,
            line_items: line_totals
                .iter()
                .map(|t| SourceLineItem {
                    product_id: 1,
                    name: String::new(),
                    quantity: 1,
                    price: *t,
                    total: *t,
                })
                .collect(),
            created_at: None,
        }
    }

    #[test]
    fn consistent_order_passes() {
        assert!(validate_order(&order_with(20.0, &[10.0, 10.0])).is_ok());
    }

    #[test]
    fn total_mismatch_fails() {
        let err = validate_order(&order_with(99.0, &[20.0])).unwrap_err();
        match err {
            SyncError::Validation(msg) => assert!(msg.contains("does not match")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn mismatch_within_epsilon_passes() {
        assert!(validate_order(&order_with(20.009, &[20.0])).is_ok());
    }

    #[test]
    fn missing_lines_fails_before_amount_check() {
        let err = validate_order(&order_with(0.0, &[])).unwrap_err();
        match err {
            SyncError::Validation(msg) => assert!(msg.contains("line_items")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn missing_customer_reference_fails() {
        let mut order = order_with(10.0, &[10.0]);
        order.customer_id = 0;
        let err = validate_order(&order).unwrap_err();
        match err {
            SyncError::Validation(msg) => assert!(msg.contains("customer_id")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    proptest! {
        /// Any order whose declared total equals its line sum validates.
        #[test]
        fn consistent_totals_always_validate(
            lines in prop::collection::vec(0.0f64..10_000.0, 1..8)
        ) {
            let total = lines.iter().sum::<f64>();
            let order = order_with(total, &lines);
            prop_assert!(validate_order(&order).is_ok());
        }

        /// Any drift beyond the tolerance is rejected.
        #[test]
        fn drifted_totals_always_fail(
            lines in prop::collection::vec(0.0f64..10_000.0, 1..8),
            drift in 0.02f64..100.0,
        ) {
            let total = lines.iter().sum::<f64>() + drift;
            let order = order_with(total, &lines);
            prop_assert!(validate_order(&order).is_err());
        }
    }
}
