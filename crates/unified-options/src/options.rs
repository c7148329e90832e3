//! Plain option values produced by the decoders.
//!
//! `Default` is the library default: every field unset.

use std::time::Duration;

use crate::concern::{ReadConcern, ReadPreference, WriteConcern};

/// Options applied to a multi-operation transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionOptions {
    pub read_concern: Option<ReadConcern>,
    pub read_preference: Option<ReadPreference>,
    pub write_concern: Option<WriteConcern>,
    pub max_commit_time: Option<Duration>,
}

/// Options applied to a logical session, including the defaults inherited by
/// transactions started within it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOptions {
    pub causal_consistency: Option<bool>,
    pub default_read_concern: Option<ReadConcern>,
    pub default_read_preference: Option<ReadPreference>,
    pub default_write_concern: Option<WriteConcern>,
    pub default_max_commit_time: Option<Duration>,
}

impl SessionOptions {
    /// Transaction defaults a session hands to transactions it starts.
    pub fn default_transaction_options(&self) -> TransactionOptions {
        TransactionOptions {
            read_concern: self.default_read_concern.clone(),
            read_preference: self.default_read_preference.clone(),
            write_concern: self.default_write_concern.clone(),
            max_commit_time: self.default_max_commit_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_unset() {
        let txn = TransactionOptions::default();
        assert!(txn.read_concern.is_none());
        assert!(txn.max_commit_time.is_none());
        let session = SessionOptions::default();
        assert!(session.causal_consistency.is_none());
        assert_eq!(
            session.default_transaction_options(),
            TransactionOptions::default()
        );
    }

    #[test]
    fn session_hands_out_its_defaults() {
        let session = SessionOptions {
            default_read_concern: Some(ReadConcern::majority()),
            default_write_concern: Some(WriteConcern::nodes(1)),
            default_max_commit_time: Some(Duration::from_millis(10)),
            ..SessionOptions::default()
        };
        let txn = session.default_transaction_options();
        assert_eq!(txn.read_concern, Some(ReadConcern::majority()));
        assert_eq!(txn.write_concern, Some(WriteConcern::nodes(1)));
        assert_eq!(txn.max_commit_time, Some(Duration::from_millis(10)));
        assert!(txn.read_preference.is_none());
    }
}
