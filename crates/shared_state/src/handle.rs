use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use bus::{Bus, ChannelName, Payload, Subscription};
use reactive::Value;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::SharedStateError;
use crate::key::StateKey;
use crate::merge::merge_fields;

/// A value that can be shared, it is copied across the bus as JSON.
pub trait StateValue: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

impl<T> StateValue for T where T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

type DefaultFactory<T> = Arc<dyn Fn() -> anyhow::Result<T> + Send + Sync + 'static>;

/// One consumer's view of a piece of shared state.
///
/// Writes never touch the handle's cell directly, they are published on the key's channel and
/// applied by the listener of every handle on that channel, this one included. Dropping the
/// handle (or calling [`StateHandle::close`]) unsubscribes the listener.
pub struct StateHandle<T> {
    key: StateKey,
    channel: ChannelName,
    bus: Bus,
    state: Value<T>,
    make_default: DefaultFactory<T>,
    subscription: Subscription,
}

impl<T: StateValue> StateHandle<T> {
    pub(crate) fn open<F>(bus: &Bus, key: StateKey, make_default: F) -> Result<Self, SharedStateError>
    where
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        let make_default: DefaultFactory<T> = Arc::new(make_default);

        let initial = make_default().map_err(|source| SharedStateError::Default {
            key: key.clone(),
            source,
        })?;
        let state = Value::new(initial);

        let channel = key.channel();
        let subscription = bus.subscribe(&channel, {
            let key = key.clone();
            let state = state.clone();
            move |payload: &Payload| apply(&key, &state, payload)
        });

        debug!(
            "Opened shared state. key: '{}', handles: {}",
            key,
            bus.subscriber_count(&channel)
        );

        Ok(Self {
            key,
            channel,
            bus: bus.clone(),
            state,
            make_default,
            subscription,
        })
    }

    pub fn key(&self) -> &StateKey {
        &self.key
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// The handle's reactive cell.
    ///
    /// Observers and [`reactive::Derived`] values built on it re-evaluate whenever a write on this
    /// key, from any handle, is delivered.
    pub fn state(&self) -> &Value<T> {
        &self.state
    }

    /// The last value delivered to this handle.
    pub fn read(&self) -> T {
        self.state.get()
    }

    /// Publishes `next` to every handle on this key, including this one.
    pub fn write(&self, next: T) -> Result<(), SharedStateError> {
        let payload = serde_json::to_value(&next).map_err(|source| SharedStateError::Encode {
            key: self.key.clone(),
            source,
        })?;

        trace!("Publishing shared state. key: '{}'", self.key);
        self.bus.publish(&self.channel, payload);

        Ok(())
    }

    /// Overrides the fields present in `partial`, keeping all others, and writes the result.
    ///
    /// The base is this handle's current value. The override is shallow: a nested record in
    /// `partial` replaces the nested record of the current value.
    pub fn merge<P>(&self, partial: &P) -> Result<(), SharedStateError>
    where
        P: Serialize + ?Sized,
    {
        let current = serde_json::to_value(self.read()).map_err(|source| self.encode_error(source))?;
        let partial = serde_json::to_value(partial).map_err(|source| self.encode_error(source))?;

        let merged = merge_fields(current, partial).map_err(|(side, found)| SharedStateError::NotARecord {
            key: self.key.clone(),
            side,
            found,
        })?;

        let next = T::deserialize(&merged).map_err(|source| SharedStateError::Decode {
            key: self.key.clone(),
            source,
        })?;

        self.write(next)
    }

    /// Writes a fresh default value.
    pub fn reset(&self) -> Result<(), SharedStateError> {
        let next = (self.make_default)().map_err(|source| SharedStateError::Default {
            key: self.key.clone(),
            source,
        })?;

        self.write(next)
    }

    /// Unsubscribes this handle, other handles on the key are unaffected.
    pub fn close(self) {
        debug!("Closing shared state. key: '{}'", self.key);
        drop(self);
    }

    fn encode_error(&self, source: serde_json::Error) -> SharedStateError {
        SharedStateError::Encode {
            key: self.key.clone(),
            source,
        }
    }
}

/// The only writer of a handle's cell.
fn apply<T: StateValue>(key: &StateKey, state: &Value<T>, payload: &Payload) {
    match T::deserialize(payload) {
        Ok(value) => {
            trace!("Applying shared state. key: '{}'", key);
            state.set(value);
        }
        Err(error) => {
            // another kind of state is using the same key.
            warn!(
                "Ignoring payload that does not match the state type. key: '{}', error: {}",
                key, error
            );
        }
    }
}

impl<T: Debug> Debug for StateHandle<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateHandle")
            .field("key", &self.key)
            .field("state", &self.state)
            .field("subscription", &self.subscription)
            .finish()
    }
}
