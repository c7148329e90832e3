//! Strict decoders for transaction and session option documents.
//!
//! A document (raw BSON bytes, a decoded [`BsonDocument`], or its JSON
//! projection) is parsed into a private record of recognized fields plus a
//! catch-all of everything else. Any leftover key rejects the whole document;
//! otherwise the recognized fields are applied one by one onto a default
//! [`TransactionOptions`] or [`SessionOptions`].
//!
//! ```
//! use serde_json::json;
//! use unified_options::{OptionsDecoder, SessionOptionsDecoder};
//!
//! let opts = SessionOptionsDecoder
//!     .decode_value(&json!({"causalConsistency": true, "maxCommitTimeMS": 500}))
//!     .unwrap();
//! assert_eq!(opts.causal_consistency, Some(true));
//! assert_eq!(opts.default_max_commit_time, Some(std::time::Duration::from_millis(500)));
//! ```

pub mod concern;
pub mod decode;
mod duration;
pub mod error;
pub mod options;

pub use concern::{
    Acknowledgment, ReadConcern, ReadConcernLevel, ReadPreference, ReadPreferenceMode, TagSet,
    WriteConcern,
};
pub use decode::{OptionsDecoder, SessionOptionsDecoder, TransactionOptionsDecoder};
pub use error::{ConversionError, DecodeError, MalformedSource};
pub use options::{SessionOptions, TransactionOptions};
pub use unified_options_bson::BsonDocument;
