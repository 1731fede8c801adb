//! `storesync-orders` — order models, validation and transformation.

pub mod model;
pub mod transform;
pub mod validate;

pub use model::{DestinationLine, DestinationOrder, SourceLineItem, SourceOrder};
pub use transform::{IdentityLookup, PartnerLookup, transform_order};
pub use validate::validate_order;
