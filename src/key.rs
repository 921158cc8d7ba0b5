//! Service identities and registration keys.

use std::any::TypeId;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Opaque identity of a service contract or concrete type.
///
/// Two identities are equal iff they denote the same type. The type name is
/// carried along for diagnostics only and never takes part in comparisons.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::ServiceId;
///
/// trait Greeter: Send + Sync {}
///
/// let a = ServiceId::of::<dyn Greeter>();
/// let b = ServiceId::of::<dyn Greeter>();
/// assert_eq!(a, b);
/// assert_ne!(a, ServiceId::of::<String>());
/// assert!(a.name().contains("Greeter"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ServiceId {
    id: TypeId,
    name: &'static str,
}

impl ServiceId {
    /// Identity of `T`. Unsized types such as `dyn Trait` are allowed.
    #[inline(always)]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The underlying `TypeId`.
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// The `std::any::type_name` of the identified type.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

// TypeId-only comparison, the name is diagnostic
impl PartialEq for ServiceId {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ServiceId {}

impl Hash for ServiceId {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for ServiceId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ServiceId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Key for registration storage and lookup.
///
/// A key is the (service, key) pair that must be unique across a container.
/// Unkeyed registrations use [`Key::Type`]; registrations qualified by a
/// string use [`Key::Named`]. A named key never matches an unkeyed one, even
/// for the same service.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{Key, ServiceId};
///
/// let plain = Key::new(ServiceId::of::<u32>(), None);
/// let named = Key::new(ServiceId::of::<u32>(), Some("port"));
///
/// assert_ne!(plain, named);
/// assert_eq!(named.name(), Some("port"));
/// assert_eq!(named.to_string(), "u32[\"port\"]");
/// assert_eq!(plain.to_string(), "u32");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Unkeyed registration of a service
    Type(ServiceId),
    /// Registration of a service qualified by a string key
    Named(ServiceId, Arc<str>),
}

impl Key {
    /// Builds the key for `service`, optionally qualified by `name`.
    pub fn new(service: ServiceId, name: Option<&str>) -> Self {
        match name {
            Some(name) => Key::Named(service, Arc::from(name)),
            None => Key::Type(service),
        }
    }

    /// The service identity part of the key.
    pub fn service(&self) -> ServiceId {
        match self {
            Key::Type(service) | Key::Named(service, _) => *service,
        }
    }

    /// The string qualifier, or `None` for unkeyed registrations.
    pub fn name(&self) -> Option<&str> {
        match self {
            Key::Type(_) => None,
            Key::Named(_, name) => Some(name),
        }
    }

    /// The type name of the service, for diagnostics.
    pub fn display_name(&self) -> &'static str {
        self.service().name()
    }

    pub(crate) fn matches(&self, service: ServiceId, name: Option<&str>) -> bool {
        self.service() == service && self.name() == name
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Type(service) => write!(f, "{}", service),
            Key::Named(service, name) => write!(f, "{}[{:?}]", service, name),
        }
    }
}

/// Helper for building the unkeyed key of a type.
#[inline(always)]
pub fn key_of_type<T: ?Sized + 'static>() -> Key {
    Key::Type(ServiceId::of::<T>())
}
