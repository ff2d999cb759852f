/// When published messages reach subscribers.
#[derive(
    Debug,
    Default,
    serde::Serialize,
    serde::Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq
)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    /// Delivered to every subscriber before `publish` returns.
    #[default]
    Immediate,
    /// Held until [`crate::Bus::dispatch_pending`] is called.
    Queued,
}

#[derive(Debug, Default, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old config
pub struct BusConfig {
    pub delivery: Delivery,
}

impl BusConfig {
    pub fn with_delivery(delivery: Delivery) -> Self {
        Self {
            delivery,
        }
    }
}
