//! The OpenAPI document parser.
//!
//! Only the parts of a document that the schema compiler needs are
//! modeled: document metadata and the `components.schemas` section.
//! Everything else is ignored.

mod types;

pub use types::*;
