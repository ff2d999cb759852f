use bus::Delivery;
use clap::ValueEnum;

/// Args decouple of CLI arg handling requirements from the internal data structures

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
#[value(rename_all = "lower")]
pub enum DeliveryArg {
    /// Deliver every write before it returns
    Immediate,
    /// Hold writes until the next `dispatch` step
    Queued,
}

impl From<DeliveryArg> for Delivery {
    fn from(value: DeliveryArg) -> Self {
        match value {
            DeliveryArg::Immediate => Self::Immediate,
            DeliveryArg::Queued => Self::Queued,
        }
    }
}
