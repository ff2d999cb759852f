//! Keyed shared state.
//!
//! Independent consumers open a handle on the same key and observe each other's writes. There is
//! no central store: every write is published on the bus channel named by the key, and every
//! handle mirrors the last value delivered on that channel into its own reactive cell.
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use shared_state::{open, Bus};
//!
//! #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
//! struct Settings {
//!     theme: String,
//!     font_size: u32,
//! }
//!
//! let bus = Bus::new();
//! let toolbar = open(&bus, "settings", Settings::default).unwrap();
//! let editor = open(&bus, "settings", Settings::default).unwrap();
//!
//! toolbar.merge(&serde_json::json!({"font_size": 14})).unwrap();
//!
//! assert_eq!(editor.read().font_size, 14);
//! assert_eq!(toolbar.read().font_size, 14);
//! ```

use std::convert::Infallible;

pub use bus::{Bus, BusConfig, Delivery};
pub use reactive::{Derived, Value, ValueExt};

pub use crate::error::{RecordSide, SharedStateError};
pub use crate::handle::{StateHandle, StateValue};
pub use crate::key::StateKey;

mod error;
mod handle;
mod key;
mod merge;

/// Opens a handle on the shared state identified by `key`.
///
/// `make_default` is invoked now to seed the handle's cell, and again on every [`StateHandle::reset`].
/// Every call subscribes a new listener, so handles opened on the same key and bus all observe
/// each other's writes.
pub fn open<T, F>(bus: &Bus, key: &str, make_default: F) -> Result<StateHandle<T>, SharedStateError>
where
    T: StateValue,
    F: Fn() -> T + Send + Sync + 'static,
{
    try_open(bus, key, move || Ok::<T, Infallible>(make_default()))
}

/// Like [`open`], for a default factory that can fail.
///
/// If the factory fails no handle is created and nothing is subscribed.
pub fn try_open<T, F, E>(bus: &Bus, key: &str, try_make_default: F) -> Result<StateHandle<T>, SharedStateError>
where
    T: StateValue,
    F: Fn() -> Result<T, E> + Send + Sync + 'static,
    E: Into<anyhow::Error>,
{
    let key = StateKey::new(key)?;

    StateHandle::open(bus, key, move || try_make_default().map_err(Into::into))
}
