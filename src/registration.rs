//! Registration types and registry storage.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::constructor::Implementation;
use crate::container::Container;
use crate::error::ContainerResult;
use crate::instance::Instance;
use crate::key::{Key, ServiceId};
use crate::lifetime::Lifetime;

/// Caller-supplied function producing a service value from the container.
///
/// Handlers may resolve their own dependencies through the container, return
/// `Ok(None)` to signal the absent value, or propagate hard errors.
pub type Factory = Arc<dyn Fn(&Container) -> ContainerResult<Option<Instance>> + Send + Sync>;

/// How a registration produces values that are not cached yet.
pub(crate) enum Source {
    /// The value was supplied at registration time
    Fixed,
    /// Built with the implementation's constructors
    Implementation(Implementation),
    /// Built by a caller-supplied handler
    Handler(Factory),
}

/// One row in the registry.
pub(crate) struct Registration {
    pub(crate) key: Key,
    pub(crate) lifetime: Lifetime,
    /// Concrete type behind the registration, when known
    pub(crate) implementation: Option<ServiceId>,
    pub(crate) source: Source,
    /// Write-once cache; `None` for per-request registrations
    pub(crate) instance: Option<OnceCell<Instance>>,
}

impl Registration {
    pub(crate) fn fixed(key: Key, instance: Instance) -> Self {
        Self {
            implementation: Some(instance.service()),
            key,
            lifetime: Lifetime::Fixed,
            source: Source::Fixed,
            instance: Some(OnceCell::with_value(instance)),
        }
    }

    pub(crate) fn constructed(key: Key, lifetime: Lifetime, implementation: Implementation) -> Self {
        Self {
            key,
            lifetime,
            implementation: Some(implementation.id()),
            source: Source::Implementation(implementation),
            instance: lifetime.caches().then(OnceCell::new),
        }
    }

    pub(crate) fn handler(key: Key, factory: Factory) -> Self {
        Self {
            key,
            lifetime: Lifetime::Singleton,
            implementation: None,
            source: Source::Handler(factory),
            instance: Some(OnceCell::new()),
        }
    }

    /// The cached value, if any.
    #[inline]
    pub(crate) fn cached(&self) -> Option<&Instance> {
        self.instance.as_ref().and_then(OnceCell::get)
    }

    /// Stores `value` unless another resolution got there first, and returns
    /// the value every later resolution will observe.
    pub(crate) fn store(&self, value: Instance) -> Instance {
        match &self.instance {
            Some(cell) => cell.get_or_init(|| value).clone(),
            None => value,
        }
    }
}

/// Append-only registration storage.
///
/// Registrations are kept in registration order. Lookup scans the Vec while
/// the registry is small and switches to the hash index beyond
/// `small_threshold` entries.
pub(crate) struct Registry {
    entries: Vec<Registration>,
    index: HashMap<Key, usize>,
    small_threshold: usize,
}

impl Registry {
    pub(crate) fn new(small_threshold: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            small_threshold,
        }
    }

    /// Appends a registration. The caller has checked the key is free.
    pub(crate) fn push(&mut self, registration: Registration) {
        debug_assert!(!self.contains(&registration.key));
        self.index.insert(registration.key.clone(), self.entries.len());
        self.entries.push(registration);
    }

    #[inline]
    pub(crate) fn get(&self, key: &Key) -> Option<&Registration> {
        if self.entries.len() <= self.small_threshold {
            self.entries.iter().find(|reg| &reg.key == key)
        } else {
            self.index.get(key).map(|&pos| &self.entries[pos])
        }
    }

    /// Lookup without building a `Key`, used on the hot resolution path.
    #[inline]
    pub(crate) fn find(&self, service: ServiceId, name: Option<&str>) -> Option<&Registration> {
        if self.entries.len() <= self.small_threshold {
            self.entries.iter().find(|reg| reg.key.matches(service, name))
        } else {
            self.get(&Key::new(service, name))
        }
    }

    #[inline]
    pub(crate) fn contains(&self, key: &Key) -> bool {
        self.get(key).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Registration> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::key_of_type;

    fn fixed<T: Send + Sync + 'static>(name: Option<&str>, value: T) -> Registration {
        Registration::fixed(Key::new(ServiceId::of::<T>(), name), Instance::from_value(value))
    }

    #[test]
    fn lookup_agrees_below_and_above_threshold() {
        for threshold in [0, 2, 64] {
            let mut registry = Registry::new(threshold);
            registry.push(fixed(None, 1u8));
            registry.push(fixed(Some("a"), 2u8));
            registry.push(fixed(Some("b"), 3u8));
            registry.push(fixed(None, 4u16));

            let value = |reg: &Registration| *reg.cached().unwrap().downcast::<u8>().unwrap();
            assert_eq!(value(registry.get(&key_of_type::<u8>()).unwrap()), 1);
            assert_eq!(value(registry.find(ServiceId::of::<u8>(), Some("b")).unwrap()), 3);
            assert!(registry.find(ServiceId::of::<u8>(), Some("c")).is_none());
            assert!(registry.get(&key_of_type::<u32>()).is_none());
        }
    }

    #[test]
    fn iteration_keeps_registration_order() {
        let mut registry = Registry::new(16);
        registry.push(fixed(Some("z"), 1u8));
        registry.push(fixed(Some("a"), 2u8));
        let names: Vec<_> = registry.iter().map(|reg| reg.key.name().unwrap().to_string()).collect();
        assert_eq!(names, vec!["z", "a"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn store_keeps_the_first_value() {
        let factory: Factory = Arc::new(|_: &Container| -> ContainerResult<Option<Instance>> { Ok(None) });
        let reg = Registration::handler(key_of_type::<u8>(), factory);
        let first = reg.store(Instance::from_value(1u8));
        let second = reg.store(Instance::from_value(2u8));
        assert!(first.ptr_eq(&second));
        assert_eq!(*second.downcast::<u8>().unwrap(), 1);
    }

    #[test]
    fn per_request_never_caches() {
        let implementation = Implementation::from_constructors::<u8, u8>(Vec::new());
        let reg = Registration::constructed(key_of_type::<u8>(), Lifetime::PerRequest, implementation);
        let first = reg.store(Instance::from_value(1u8));
        assert!(reg.cached().is_none());
        assert_eq!(*first.downcast::<u8>().unwrap(), 1);
    }
}
