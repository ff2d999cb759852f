use std::fmt::{Display, Formatter};
use std::str::FromStr;

use bus::ChannelName;

use crate::error::SharedStateError;

/// Identifies one logical piece of shared state.
///
/// Handles observe each other only when opened with identical keys. Unrelated state sharing a key
/// will see each other's writes.
#[derive(
    Debug,
    serde::Serialize,
    serde::Deserialize,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash
)]
#[serde(try_from = "String", into = "String")]
pub struct StateKey(String);

impl StateKey {
    pub fn new(key: &str) -> Result<Self, SharedStateError> {
        if key.is_empty() {
            return Err(SharedStateError::EmptyKey);
        }

        Ok(Self(key.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The bus channel this state is broadcast on.
    pub fn channel(&self) -> ChannelName {
        ChannelName::from(self.0.as_str())
    }
}

impl FromStr for StateKey {
    type Err = SharedStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for StateKey {
    type Error = SharedStateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<StateKey> for String {
    fn from(value: StateKey) -> Self {
        value.0
    }
}

impl Display for StateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
