//! Read concern, read preference and write concern values together with the
//! converters that build them from their sub-documents.
//!
//! Converters are lenient about keys they do not use; only the two option
//! shapes in [`crate::decode`] reject unknown fields.

mod read_concern;
mod read_preference;
mod write_concern;

pub use read_concern::{ReadConcern, ReadConcernLevel};
pub use read_preference::{ReadPreference, ReadPreferenceMode, TagSet};
pub use write_concern::{Acknowledgment, WriteConcern};
