//! `storesync-customers` — customer models, validation and transformation.

pub mod model;
pub mod transform;
pub mod validate;

pub use model::{BillingInfo, DestinationCustomer, SourceCustomer};
pub use transform::{transform_customer, transform_customer_back};
pub use validate::validate_customer;
