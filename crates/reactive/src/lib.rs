//! Thread-safe reactive cells.
//!
//! This crate provides the reactive primitive that shared state is mirrored into: a cell whose
//! writes are observable by dependents.
//!
//! # Key Features
//!
//! - `Value<T>`, a cell that notifies its observers whenever it is `set`
//! - `Derived<T>`, a computed value that re-evaluates when any of its dependencies change
//! - Observers can be removed again, dependents detach themselves when dropped
//!
//! # Example
//!
//! ```rust
//! use reactive::{Value, Derived};
//!
//! let width = Value::new(3u32);
//! let height = Value::new(4u32);
//!
//! let area = Derived::new(&[width.clone(), height.clone()], {
//!     let width = width.clone();
//!     let height = height.clone();
//!     move || width.get() * height.get()
//! });
//!
//! width.set(5);
//!
//! assert_eq!(area.get(), 20);
//! ```

pub mod reactive;

pub use reactive::{Derived, ObserverId, Value, ValueExt, WeakValue};
