//! The service container.
//!
//! This module contains the [`Container`] type: the registry of
//! registrations, the four registration strategies and, in `resolve`, the
//! resolution and construction algorithm.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::config::ContainerOptions;
use crate::constructor::Implementation;
use crate::descriptors::ServiceDescriptor;
use crate::error::{ContainerError, ContainerResult};
use crate::instance::Instance;
use crate::key::{Key, ServiceId};
use crate::lifetime::Lifetime;
use crate::observer::{ContainerObserver, Observers};
use crate::registration::{Factory, Registration, Registry, Source};

mod resolve;
mod typed;

static NEXT_CONTAINER_ID: AtomicUsize = AtomicUsize::new(1);

/// Keyed service container.
///
/// A container maps a service identity, optionally qualified by a string
/// key, to a fixed value, a constructible implementation or a handler, and
/// resolves dependency graphs by constructing required parameters
/// recursively.
///
/// # Registration and resolution phases
///
/// Registration takes `&mut self` and resolution takes `&self`. Register
/// everything during start-up, then share the container (for example behind
/// an `Arc`) and resolve concurrently from any thread.
///
/// # Examples
///
/// ```
/// use ferrous_container::{implements, Constructor, Container, Injectable, Resolver};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct Polite {
///     name: Arc<String>,
/// }
///
/// impl Greeter for Polite {
///     fn greet(&self) -> String {
///         format!("Good day, {}", self.name)
///     }
/// }
///
/// impl Injectable for Polite {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::unary(|name: Arc<String>| Ok(Polite { name }))]
///     }
/// }
///
/// implements!(Polite => dyn Greeter);
///
/// let mut container = Container::new();
/// container.instance(Arc::new("Ada".to_string())).unwrap();
/// container.singleton::<dyn Greeter, Polite>().unwrap();
///
/// let greeter = container.resolve_required::<dyn Greeter>().unwrap();
/// assert_eq!(greeter.greet(), "Good day, Ada");
/// ```
pub struct Container {
    id: usize,
    registry: Registry,
    observers: Observers,
    options: ContainerOptions,
}

impl Container {
    /// Creates an empty container with default options.
    pub fn new() -> Self {
        Self::with_options(ContainerOptions::default())
    }

    /// Creates an empty container with the given options.
    pub fn with_options(options: ContainerOptions) -> Self {
        Self {
            id: NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed),
            registry: Registry::new(options.small_threshold),
            observers: Observers::new(),
            options,
        }
    }

    /// The options this container was created with.
    pub fn options(&self) -> &ContainerOptions {
        &self.options
    }

    /// Adds an observer notified of resolution events.
    pub fn add_observer(&mut self, observer: Arc<dyn ContainerObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    // ----- Registration -----

    /// Registers an already-constructed value.
    ///
    /// The value must be shaped for `service` (see [`Instance::new`]).
    ///
    /// # Errors
    ///
    /// - [`ContainerError::InvalidArgument`] if `service` or `instance` is `None`
    /// - [`ContainerError::TypeMismatch`] if the instance was built for another service
    /// - [`ContainerError::AlreadyRegistered`] if `(service, key)` is taken
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_container::{Container, ContainerError, Instance, Resolver, ServiceId};
    ///
    /// let mut container = Container::new();
    /// container
    ///     .register_instance(Some(ServiceId::of::<f64>()), Some(Instance::from_value(3.14f64)), None)
    ///     .unwrap();
    /// assert_eq!(*container.resolve_required::<f64>().unwrap(), 3.14);
    ///
    /// assert!(matches!(
    ///     container.register_instance(None, None, None),
    ///     Err(ContainerError::InvalidArgument("service"))
    /// ));
    /// ```
    pub fn register_instance(
        &mut self,
        service: Option<ServiceId>,
        instance: Option<Instance>,
        key: Option<&str>,
    ) -> ContainerResult<()> {
        let service = service.ok_or(ContainerError::InvalidArgument("service"))?;
        let instance = instance.ok_or(ContainerError::InvalidArgument("instance"))?;
        ensure_shape(service, instance.service())?;
        let key = self.vacant(service, key)?;
        self.push(Registration::fixed(key, instance));
        Ok(())
    }

    /// Registers an implementation constructed once, on first resolution.
    ///
    /// # Errors
    ///
    /// - [`ContainerError::InvalidArgument`] if `service` or `implementation` is `None`
    /// - [`ContainerError::TypeMismatch`] if the implementation is bound to another service
    /// - [`ContainerError::AlreadyRegistered`] if `(service, key)` is taken
    pub fn register_singleton(
        &mut self,
        service: Option<ServiceId>,
        implementation: Option<Implementation>,
        key: Option<&str>,
    ) -> ContainerResult<()> {
        self.register_constructed(Lifetime::Singleton, service, implementation, key)
    }

    /// Registers an implementation constructed anew on every resolution.
    ///
    /// # Errors
    ///
    /// Same as [`register_singleton`](Self::register_singleton).
    pub fn register_per_request(
        &mut self,
        service: Option<ServiceId>,
        implementation: Option<Implementation>,
        key: Option<&str>,
    ) -> ContainerResult<()> {
        self.register_constructed(Lifetime::PerRequest, service, implementation, key)
    }

    /// Registers a handler invoked on first resolution; its result is cached.
    ///
    /// # Errors
    ///
    /// - [`ContainerError::InvalidArgument`] if `service` or `factory` is `None`
    /// - [`ContainerError::AlreadyRegistered`] if `(service, key)` is taken
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_container::{Container, ContainerResult, Factory, Instance, Resolver, ServiceId};
    /// use std::sync::Arc;
    ///
    /// let factory: Factory = Arc::new(|_: &Container| -> ContainerResult<Option<Instance>> {
    ///     Ok(Some(Instance::from_value(String::from("hi"))))
    /// });
    ///
    /// let mut container = Container::new();
    /// container.register_handler(Some(ServiceId::of::<String>()), Some(factory), Some("greeting")).unwrap();
    ///
    /// let a = container.resolve_required_keyed::<String>("greeting").unwrap();
    /// let b = container.resolve_required_keyed::<String>("greeting").unwrap();
    /// assert!(Arc::ptr_eq(&a, &b));
    /// ```
    pub fn register_handler(
        &mut self,
        service: Option<ServiceId>,
        factory: Option<Factory>,
        key: Option<&str>,
    ) -> ContainerResult<()> {
        let service = service.ok_or(ContainerError::InvalidArgument("service"))?;
        let factory = factory.ok_or(ContainerError::InvalidArgument("factory"))?;
        let key = self.vacant(service, key)?;
        self.push(Registration::handler(key, factory));
        Ok(())
    }

    fn register_constructed(
        &mut self,
        lifetime: Lifetime,
        service: Option<ServiceId>,
        implementation: Option<Implementation>,
        key: Option<&str>,
    ) -> ContainerResult<()> {
        let service = service.ok_or(ContainerError::InvalidArgument("service"))?;
        let implementation = implementation.ok_or(ContainerError::InvalidArgument("implementation"))?;
        ensure_shape(service, implementation.service())?;
        let key = self.vacant(service, key)?;
        self.push(Registration::constructed(key, lifetime, implementation));
        Ok(())
    }

    /// Builds the key for `(service, name)`, failing if it is already taken.
    fn vacant(&self, service: ServiceId, name: Option<&str>) -> ContainerResult<Key> {
        let key = Key::new(service, name);
        if self.registry.contains(&key) {
            return Err(ContainerError::AlreadyRegistered(key));
        }
        Ok(key)
    }

    fn push(&mut self, registration: Registration) {
        debug!(
            service = %registration.key,
            lifetime = ?registration.lifetime,
            implementation = registration.implementation.map(|id| id.name()),
            "registered"
        );
        self.registry.push(registration);
    }

    // ----- Introspection -----

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Whether nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    /// Whether `(service, key)` is registered.
    pub fn contains(&self, service: ServiceId, key: Option<&str>) -> bool {
        self.registry.find(service, key).is_some()
    }

    /// Descriptors of every registration, in registration order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_container::{Container, Lifetime};
    /// use std::sync::Arc;
    ///
    /// let mut container = Container::new();
    /// container.instance(Arc::new(42u32)).unwrap();
    /// container.instance_keyed("port", Arc::new(8080u32)).unwrap();
    ///
    /// let descriptors = container.descriptors();
    /// assert_eq!(descriptors.len(), 2);
    /// assert_eq!(descriptors[1].key_name(), Some("port"));
    /// assert!(descriptors.iter().all(|d| d.lifetime == Lifetime::Fixed && d.materialized));
    /// ```
    pub fn descriptors(&self) -> Vec<ServiceDescriptor> {
        self.registry
            .iter()
            .map(|reg| ServiceDescriptor {
                key: reg.key.clone(),
                lifetime: reg.lifetime,
                implementation: reg.implementation,
                has_handler: matches!(reg.source, Source::Handler(_)),
                materialized: reg.cached().is_some(),
            })
            .collect()
    }

    pub(crate) fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("id", &self.id)
            .field("registrations", &self.registry.len())
            .field("options", &self.options)
            .finish()
    }
}

/// Every value stored for `service` must be shaped for it.
pub(crate) fn ensure_shape(service: ServiceId, found: ServiceId) -> ContainerResult<()> {
    if service == found {
        Ok(())
    } else {
        Err(ContainerError::TypeMismatch {
            expected: service.name(),
            found: found.name(),
        })
    }
}
