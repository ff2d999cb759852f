use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::key::StateKey;

#[derive(Error, Debug)]
pub enum SharedStateError {
    #[error("Invalid state key, the key must not be empty")]
    EmptyKey,

    #[error("Default state factory failed. key: '{key}', cause: {source}")]
    Default { key: StateKey, source: anyhow::Error },

    #[error("Unable to encode state. key: '{key}', cause: {source}")]
    Encode { key: StateKey, source: serde_json::Error },

    #[error("Merged state does not match the state type. key: '{key}', cause: {source}")]
    Decode { key: StateKey, source: serde_json::Error },

    #[error("Merge requires records. key: '{key}', {side}: {found}")]
    NotARecord {
        key: StateKey,
        side: RecordSide,
        found: &'static str,
    },
}

/// Which operand of a merge was not a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSide {
    Current,
    Partial,
}

impl Display for RecordSide {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordSide::Current => f.write_str("current"),
            RecordSide::Partial => f.write_str("partial"),
        }
    }
}
