//! Observer hooks for resolution events.
//!
//! Observers give structured insight into what the container resolves, how
//! long construction takes, and which constructors were rejected during
//! overload selection.

use std::sync::Arc;
use std::time::Duration;

use crate::diagnostics::RejectedConstructor;
use crate::key::Key;

/// Observer trait for container resolution events.
///
/// Observer calls are made synchronously during resolution. Keep
/// implementations lightweight. Cache hits on singletons and fixed instances
/// are not reported; only resolutions that look up or construct something are.
///
/// # Examples
///
/// ```
/// use ferrous_container::{Container, ContainerObserver, Key, Resolver};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Misses(Mutex<Vec<String>>);
///
/// impl ContainerObserver for Misses {
///     fn resolved(&self, key: &Key, _duration: Duration, found: bool) {
///         if !found {
///             self.0.lock().unwrap().push(key.to_string());
///         }
///     }
/// }
///
/// let misses = Arc::new(Misses::default());
/// let mut container = Container::new();
/// container.add_observer(misses.clone());
///
/// assert!(container.resolve::<u32>().unwrap().is_none());
/// assert_eq!(misses.0.lock().unwrap().as_slice(), ["u32"]);
/// ```
pub trait ContainerObserver: Send + Sync {
    /// Called before a registration is looked up and, if needed, constructed.
    fn resolving(&self, _key: &Key) {}

    /// Called when a resolution finishes without a hard error.
    ///
    /// `found` is false when the service is not registered or no
    /// constructor could build it.
    fn resolved(&self, _key: &Key, _duration: Duration, _found: bool) {}

    /// Called for every constructor that declined to build.
    fn constructor_rejected(&self, _key: &Key, _rejection: &RejectedConstructor) {}
}

/// Container for registered observers.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn ContainerObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn ContainerObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn resolving(&self, key: &Key) {
        for observer in &self.observers {
            observer.resolving(key);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, key: &Key, duration: Duration, found: bool) {
        for observer in &self.observers {
            observer.resolved(key, duration, found);
        }
    }

    #[inline]
    pub(crate) fn constructor_rejected(&self, key: &Key, rejection: &RejectedConstructor) {
        for observer in &self.observers {
            observer.constructor_rejected(key, rejection);
        }
    }
}

/// Observer that forwards every event to `tracing` at debug level.
///
/// ```
/// use ferrous_container::{Container, TracingObserver};
/// use std::sync::Arc;
///
/// let mut container = Container::new();
/// container.add_observer(Arc::new(TracingObserver::new("app")));
/// ```
#[derive(Debug, Clone)]
pub struct TracingObserver {
    label: &'static str,
}

impl TracingObserver {
    /// Creates an observer whose events carry `label`.
    pub fn new(label: &'static str) -> Self {
        Self { label }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("container")
    }
}

impl ContainerObserver for TracingObserver {
    fn resolving(&self, key: &Key) {
        tracing::debug!(label = self.label, service = %key, "resolving");
    }

    fn resolved(&self, key: &Key, duration: Duration, found: bool) {
        tracing::debug!(
            label = self.label,
            service = %key,
            found,
            elapsed_us = duration.as_micros() as u64,
            "resolved"
        );
    }

    fn constructor_rejected(&self, key: &Key, rejection: &RejectedConstructor) {
        tracing::debug!(
            label = self.label,
            service = %key,
            implementation = rejection.implementation,
            index = rejection.index,
            reason = %rejection.reason,
            "constructor rejected"
        );
    }
}
