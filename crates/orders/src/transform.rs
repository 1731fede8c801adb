//! Source-to-destination order mapping.
//!
//! The transformer is a pure function over a validated order: no I/O,
//! no failure path. Resolving the source customer reference to a
//! destination partner is a pluggable lookup supplied by the caller.

use crate::model::{DestinationLine, DestinationOrder, SourceOrder};

/// Resolves a source customer reference to a destination partner reference.
///
/// Implementations may consult a local mapping table or the destination
/// API. Returning `None` means the customer is unknown downstream; the
/// sync manager treats that as a validation failure for the order.
pub trait PartnerLookup: Send + Sync {
    fn resolve(&self, customer_id: u64) -> Option<String>;
}

/// Pass the source customer id through verbatim.
///
/// Suitable when source and destination share customer numbering.
#[derive(Debug, Default)]
pub struct IdentityLookup;

impl PartnerLookup for IdentityLookup {
    fn resolve(&self, customer_id: u64) -> Option<String> {
        Some(customer_id.to_string())
    }
}

/// Map a validated source order to the destination shape.
///
/// Lines carry product reference, quantity and unit price verbatim; the
/// declared total is not carried (the destination recomputes it).
pub fn transform_order(order: &SourceOrder, partner_ref: &str) -> DestinationOrder {
    DestinationOrder {
        partner_ref: partner_ref.to_string(),
        lines: order
            .line_items
            .iter()
            .map(|item| DestinationLine {
                product_ref: item.product_id.to_string(),
                quantity: item.quantity,
                unit_price: item.price,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceLineItem;

    fn sample_order() -> SourceOrder {
        SourceOrder {
            id: 1,
            customer_id: 1,
            status: "processing".into(),
            currency: "EUR".into(),
            total: 20.0,
            line_items: vec![SourceLineItem {
                product_id: 1,
                name: "widget".into(),
                quantity: 2,
                price: 10.0,
                total: 20.0,
            }],
            created_at: None,
        }
    }

    #[test]
    fn lines_carry_over_verbatim() {
        let dest = transform_order(&sample_order(), "1");

        assert_eq!(dest.partner_ref, "1");
        assert_eq!(dest.lines.len(), 1);
        assert_eq!(dest.lines[0].product_ref, "1");
        assert_eq!(dest.lines[0].quantity, 2);
        assert_eq!(dest.lines[0].unit_price, 10.0);
    }

    #[test]
    fn transform_does_not_consume_or_mutate_source() {
        let order = sample_order();
        let before = order.clone();
        let _ = transform_order(&order, "7");
        assert_eq!(order, before);
    }

    #[test]
    fn identity_lookup_passes_id_through() {
        assert_eq!(IdentityLookup.resolve(42), Some("42".to_string()));
    }
}
