use std::fmt::{Display, Formatter};

/// Messages are carried as JSON, so every subscriber gets its own copy of the payload.
pub type Payload = serde_json::Value;

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
#[serde(transparent)]
pub struct ChannelName(String);

impl ChannelName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ChannelName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ChannelName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for ChannelName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A published payload, only exists while it is queued or being dispatched.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub channel: ChannelName,
    pub payload: Payload,
}
