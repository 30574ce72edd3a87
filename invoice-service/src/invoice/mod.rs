//! Invoice assembly: derived fields and the invoice document layout.

pub mod compose;
pub mod fields;
pub mod issuer;

pub use compose::{compose, format_amount, CompositionError};
pub use fields::{derive, InvoiceFields};
pub use issuer::IssuerProfile;
