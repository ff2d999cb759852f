//! A constructible, in-process broadcast bus.
//!
//! Independent parts of a program exchange messages by agreeing on a channel name, without a
//! reference to each other. Every subscriber of a channel receives every message published on
//! it, in subscription order.
//!
//! ```rust
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use bus::{Bus, ChannelName};
//!
//! let bus = Bus::new();
//! let channel = ChannelName::from("greetings");
//!
//! let received = Arc::new(Mutex::new(Vec::new()));
//! let _subscription = bus.subscribe(&channel, {
//!     let received = received.clone();
//!     move |payload| received.lock().push(payload.clone())
//! });
//!
//! bus.publish(&channel, serde_json::json!("hello"));
//!
//! assert_eq!(*received.lock(), vec![serde_json::json!("hello")]);
//! ```

mod bus;
pub mod config;
mod message;

pub use bus::{Bus, Subscription, SubscriptionId};
pub use config::{BusConfig, Delivery};
pub use message::{ChannelName, Message, Payload};
