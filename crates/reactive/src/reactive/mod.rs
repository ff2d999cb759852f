//! Core reactive system components.
//!
//! - `Value<T>`: A thread-safe container for values that can be monitored for changes
//! - `Derived<T>`: Computed values that automatically update when dependencies change
//!
//! Notifications are synchronous, observers run on the thread that called `set`, after the
//! value's lock has been released.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use reactive::{Value, ValueExt};
//!
//! let count = Value::new(0i32);
//!
//! let notifications = Arc::new(AtomicUsize::new(0));
//! let observer = count.on_change({
//!     let notifications = notifications.clone();
//!     move || {
//!         notifications.fetch_add(1, Ordering::SeqCst);
//!     }
//! });
//!
//! count.set(5);
//! count.remove_observer(observer);
//! count.set(6);
//!
//! assert_eq!(notifications.load(Ordering::SeqCst), 1);
//! assert_eq!(count.get(), 6);
//! ```

mod derived;
mod value;

pub use derived::Derived;
pub use value::{ObserverId, Value, ValueExt, WeakValue};
