use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use parking_lot::Mutex;

use super::value::{Value, ValueExt};

type Detach = Box<dyn FnOnce() + Send + 'static>;

/// Observer registrations on the dependencies, removed when the last clone of the [`Derived`]
/// is dropped.
struct Bindings {
    detach: Mutex<Vec<Detach>>,
}

impl Drop for Bindings {
    fn drop(&mut self) {
        for detach in self.detach.get_mut().drain(..) {
            detach();
        }
    }
}

/// A value computed from one or more dependency values.
///
/// The compute function is run once on construction and again, synchronously, whenever any
/// dependency is `set`. The derived value is itself a [`Value`], so it can be observed and used
/// as a dependency of further derived values.
pub struct Derived<T> {
    value: Value<T>,
    _bindings: Arc<Bindings>,
}

impl<T> Clone for Derived<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            _bindings: self._bindings.clone(),
        }
    }
}

impl<T: Send + 'static> Derived<T> {
    pub fn new<D, F>(dependencies: &[Value<D>], compute: F) -> Self
    where
        D: Send + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let compute = Arc::new(compute);
        let value = Value::new(compute());

        let detach = dependencies
            .iter()
            .map(|dependency| {
                let target = value.downgrade();
                let compute = compute.clone();
                let id = dependency.on_change(move || {
                    if let Some(target) = target.upgrade() {
                        target.set(compute());
                    }
                });

                let dependency = dependency.downgrade();
                let detach: Detach = Box::new(move || {
                    if let Some(dependency) = dependency.upgrade() {
                        dependency.remove_observer(id);
                    }
                });
                detach
            })
            .collect();

        Self {
            value,
            _bindings: Arc::new(Bindings {
                detach: Mutex::new(detach),
            }),
        }
    }

    /// The underlying value, e.g. to register observers or to derive from.
    pub fn value(&self) -> &Value<T> {
        &self.value
    }
}

impl<T: Clone> Derived<T> {
    pub fn get(&self) -> T {
        self.value.get()
    }
}

impl<T: Debug> Debug for Derived<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Derived")
            .field("value", &self.value)
            .finish()
    }
}
