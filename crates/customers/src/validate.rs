//! Customer validation.

use std::sync::OnceLock;

use regex::Regex;
use storesync_core::{SyncError, SyncResult};

use crate::model::SourceCustomer;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("email pattern is a fixed literal")
    })
}

/// Validate a source customer: required fields first, then email shape.
/// First failure wins; never mutates the input.
pub fn validate_customer(customer: &SourceCustomer) -> SyncResult<()> {
    let mut missing = Vec::new();
    if customer.id == 0 {
        missing.push("id");
    }
    if customer.email.is_empty() {
        missing.push("email");
    }
    if customer.first_name.is_empty() {
        missing.push("first_name");
    }
    if customer.last_name.is_empty() {
        missing.push("last_name");
    }
    if !missing.is_empty() {
        return Err(SyncError::validation(format!(
            "missing required customer fields: {}",
            missing.join(", ")
        )));
    }

    if !email_pattern().is_match(&customer.email) {
        return Err(SyncError::validation(format!(
            "invalid email for customer {}: {}",
            customer.id, customer.email
        )));
    }

    Ok(())
}
