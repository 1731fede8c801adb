//! Customer mapping between the shop and destination shapes.
//!
//! Pure functions both ways. The reverse direction exists for manual
//! reconciliation tooling, not for the sync loop itself.

use crate::model::{BillingInfo, DestinationCustomer, SourceCustomer};

/// Map a source customer to the destination's flat partner shape.
pub fn transform_customer(customer: &SourceCustomer) -> DestinationCustomer {
    let name = format!("{} {}", customer.first_name, customer.last_name)
        .trim()
        .to_string();

    DestinationCustomer {
        name,
        email: customer.email.clone(),
        phone: customer.billing.phone.clone(),
        street: customer.billing.address_1.clone(),
        city: customer.billing.city.clone(),
        zip: customer.billing.postcode.clone(),
        country_code: customer.billing.country.clone(),
    }
}

/// Map a destination partner back to the shop shape.
///
/// The full name splits on the first space; everything after it becomes
/// the last name.
pub fn transform_customer_back(partner: &DestinationCustomer) -> SourceCustomer {
    let (first_name, last_name) = match partner.name.split_once(' ') {
        Some((first, rest)) => (first.to_string(), rest.to_string()),
        None => (partner.name.clone(), String::new()),
    };

    SourceCustomer {
        id: 0,
        email: partner.email.clone(),
        first_name,
        last_name,
        billing: BillingInfo {
            phone: partner.phone.clone(),
            address_1: partner.street.clone(),
            city: partner.city.clone(),
            postcode: partner.zip.clone(),
            country: partner.country_code.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_customer() -> SourceCustomer {
        SourceCustomer {
            id: 5,
            email: "ada@example.com".into(),
            first_name: "Ada".into(),
            last_name: "Byron".into(),
            billing: BillingInfo {
                phone: "+44 20 0000".into(),
                address_1: "1 Marylebone Rd".into(),
                city: "London".into(),
                postcode: "NW1".into(),
                country: "GB".into(),
            },
        }
    }

    #[test]
    fn billing_block_flattens() {
        let dest = transform_customer(&sample_customer());
        assert_eq!(dest.name, "Ada Byron");
        assert_eq!(dest.street, "1 Marylebone Rd");
        assert_eq!(dest.zip, "NW1");
        assert_eq!(dest.country_code, "GB");
    }

    #[test]
    fn empty_names_do_not_leave_stray_whitespace() {
        let mut customer = sample_customer();
        customer.last_name.clear();
        let dest = transform_customer(&customer);
        assert_eq!(dest.name, "Ada");
    }

    #[test]
    fn name_splits_on_first_space_only() {
        let partner = DestinationCustomer {
            name: "Ada Lovelace Byron".into(),
            ..DestinationCustomer::default()
        };
        let back = transform_customer_back(&partner);
        assert_eq!(back.first_name, "Ada");
        assert_eq!(back.last_name, "Lovelace Byron");
    }

    #[test]
    fn single_word_name_has_empty_last_name() {
        let partner = DestinationCustomer {
            name: "Cher".into(),
            ..DestinationCustomer::default()
        };
        let back = transform_customer_back(&partner);
        assert_eq!(back.first_name, "Cher");
        assert_eq!(back.last_name, "");
    }

    proptest! {
        /// Round-tripping a customer with single-word names preserves
        /// the name fields.
        #[test]
        fn name_round_trip(
            first in "[A-Za-z]{1,12}",
            last in "[A-Za-z]{1,12}",
        ) {
            let mut customer = sample_customer();
            customer.first_name = first.clone();
            customer.last_name = last.clone();
            let back = transform_customer_back(&transform_customer(&customer));
            prop_assert_eq!(back.first_name, first);
            prop_assert_eq!(back.last_name, last);
        }
    }
}
