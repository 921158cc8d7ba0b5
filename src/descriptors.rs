//! Service descriptors for introspection and diagnostics.

use crate::key::{Key, ServiceId};
use crate::lifetime::Lifetime;

/// Service descriptor for introspection and diagnostics
///
/// A snapshot of one registration, returned by
/// [`Container::descriptors`](crate::Container::descriptors) in registration
/// order.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{Constructor, Container, Injectable, Lifetime};
/// use std::sync::Arc;
///
/// struct Database;
/// impl Injectable for Database {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::nullary(|| Database)]
///     }
/// }
///
/// let mut container = Container::new();
/// container.singleton::<Database, Database>().unwrap();
/// container.instance_keyed("max_connections", Arc::new(100u32)).unwrap();
///
/// let descriptors = container.descriptors();
///
/// let db = &descriptors[0];
/// assert_eq!(db.lifetime, Lifetime::Singleton);
/// assert!(db.type_name().contains("Database"));
/// assert!(!db.is_keyed());
/// assert!(!db.materialized);
///
/// let limit = &descriptors[1];
/// assert_eq!(limit.key_name(), Some("max_connections"));
/// assert_eq!(limit.type_name(), "u32");
/// ```
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    /// The service key (type with optional key name)
    pub key: Key,
    /// Service lifetime
    pub lifetime: Lifetime,
    /// Concrete implementation type, when known
    pub implementation: Option<ServiceId>,
    /// Whether values come from a caller-supplied handler
    pub has_handler: bool,
    /// Whether a value is cached (always true for fixed instances)
    pub materialized: bool,
}

impl ServiceDescriptor {
    /// The key name for keyed registrations, or `None`.
    pub fn key_name(&self) -> Option<&str> {
        self.key.name()
    }

    /// The service type name.
    pub fn type_name(&self) -> &'static str {
        self.key.display_name()
    }

    /// The implementation type name, when known.
    pub fn implementation_name(&self) -> Option<&'static str> {
        self.implementation.map(|id| id.name())
    }

    /// Whether this registration is keyed.
    pub fn is_keyed(&self) -> bool {
        self.key_name().is_some()
    }
}
