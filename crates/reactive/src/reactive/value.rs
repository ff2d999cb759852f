use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, MutexGuard};

/// Identifies an observer registered on a [`Value`], used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

type Observer = Arc<dyn Fn() + Send + Sync + 'static>;

struct Shared<T> {
    value: Mutex<T>,
    observers: Mutex<Vec<(ObserverId, Observer)>>,
    next_observer_id: AtomicU64,
}

/// A thread-safe container for a value that can be monitored for changes.
///
/// Clones share the same underlying cell.
pub struct Value<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Value<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> Value<T> {
    pub fn new(value: T) -> Self {
        Self {
            shared: Arc::new(Shared {
                value: Mutex::new(value),
                observers: Mutex::new(Vec::new()),
                next_observer_id: AtomicU64::new(0),
            }),
        }
    }

    /// Direct access to the contained value.
    ///
    /// Changes made through the guard do NOT notify observers, use [`Value::set`] or
    /// [`Value::update`] for that.
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.shared.value.lock()
    }

    /// Replaces the value and notifies all observers.
    pub fn set(&self, value: T) {
        let previous = {
            let mut guard = self.shared.value.lock();
            std::mem::replace(&mut *guard, value)
        };
        drop(previous);

        self.notify();
    }

    /// Modifies the value in place and notifies all observers.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        {
            let mut guard = self.shared.value.lock();
            f(&mut guard);
        }

        self.notify();
    }

    /// Invokes every observer, in registration order.
    ///
    /// The observer list is snapshotted first, observers may read this value, register or remove
    /// observers while being notified.
    pub fn notify(&self) {
        let observers: Vec<Observer> = self
            .shared
            .observers
            .lock()
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect();

        for observer in observers {
            observer();
        }
    }

    /// Returns `true` if the observer was registered.
    pub fn remove_observer(&self, id: ObserverId) -> bool {
        let mut observers = self.shared.observers.lock();
        let count_before = observers.len();
        observers.retain(|(candidate, _)| *candidate != id);

        observers.len() != count_before
    }

    pub fn observer_count(&self) -> usize {
        self.shared.observers.lock().len()
    }

    pub fn downgrade(&self) -> WeakValue<T> {
        WeakValue {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// `true` if both values refer to the same cell.
    pub fn ptr_eq(&self, other: &Value<T>) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl<T: Clone> Value<T> {
    /// Returns a clone of the current value.
    pub fn get(&self) -> T {
        self.shared.value.lock().clone()
    }
}

impl<T: Default> Default for Value<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Debug> Debug for Value<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Value")
            .field("value", &*self.shared.value.lock())
            .field("observers", &self.shared.observers.lock().len())
            .finish()
    }
}

pub trait ValueExt {
    /// Registers a callback that is invoked after every change.
    fn on_change<F>(&self, f: F) -> ObserverId
    where
        F: Fn() + Send + Sync + 'static;
}

impl<T> ValueExt for Value<T> {
    fn on_change<F>(&self, f: F) -> ObserverId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = ObserverId(
            self.shared
                .next_observer_id
                .fetch_add(1, Ordering::Relaxed),
        );
        let observer: Observer = Arc::new(f);
        self.shared
            .observers
            .lock()
            .push((id, observer));

        id
    }
}

/// A non-owning reference to a [`Value`].
pub struct WeakValue<T> {
    shared: Weak<Shared<T>>,
}

impl<T> Clone for WeakValue<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> WeakValue<T> {
    pub fn upgrade(&self) -> Option<Value<T>> {
        self.shared
            .upgrade()
            .map(|shared| Value {
                shared,
            })
    }
}
