//! Resolver traits for service resolution.

use std::sync::Arc;

use crate::error::{ContainerError, ContainerResult};
use crate::instance::Instance;
use crate::key::{Key, ServiceId};

/// Core resolver trait for object-safe service resolution.
///
/// This is the dynamic entry point: it takes a service identity and an
/// optional key and returns the type-erased [`Instance`]. Most callers use
/// the generic methods of [`Resolver`] instead, which every `ResolverCore`
/// gets for free.
pub trait ResolverCore: Send + Sync {
    /// Resolves `(service, key)`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(instance))` - the fixed, cached or freshly constructed value
    /// * `Ok(None)` - the service is not registered, or no constructor could build it
    /// * `Err(_)` - `service` was `None`, or a hard error occurred (circular
    ///   dependency, depth limit, handler producing the wrong shape)
    fn resolve_instance(
        &self,
        service: Option<ServiceId>,
        key: Option<&str>,
    ) -> ContainerResult<Option<Instance>>;
}

/// Generic resolution helpers built on [`ResolverCore`].
///
/// # Examples
///
/// ```
/// use ferrous_container::{Container, ContainerError, Resolver};
/// use std::sync::Arc;
///
/// let mut container = Container::new();
/// container.instance_keyed("retries", Arc::new(3u8)).unwrap();
///
/// assert!(container.resolve::<u8>().unwrap().is_none());
/// assert_eq!(*container.resolve_keyed::<u8>("retries").unwrap().unwrap(), 3);
/// assert!(matches!(container.resolve_required::<u8>(), Err(ContainerError::NotFound(_))));
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves the unkeyed registration of `S`.
    fn resolve<S>(&self) -> ContainerResult<Option<Arc<S>>>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        downcast(self.resolve_instance(Some(ServiceId::of::<S>()), None)?)
    }

    /// Resolves the registration of `S` under `key`.
    fn resolve_keyed<S>(&self, key: &str) -> ContainerResult<Option<Arc<S>>>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        downcast(self.resolve_instance(Some(ServiceId::of::<S>()), Some(key))?)
    }

    /// Like [`resolve`](Self::resolve), but the absent value is
    /// [`ContainerError::NotFound`].
    fn resolve_required<S>(&self) -> ContainerResult<Arc<S>>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        self.resolve::<S>()?
            .ok_or_else(|| ContainerError::NotFound(Key::Type(ServiceId::of::<S>())))
    }

    /// Like [`resolve_keyed`](Self::resolve_keyed), but the absent value is
    /// [`ContainerError::NotFound`].
    fn resolve_required_keyed<S>(&self, key: &str) -> ContainerResult<Arc<S>>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        self.resolve_keyed::<S>(key)?
            .ok_or_else(|| ContainerError::NotFound(Key::new(ServiceId::of::<S>(), Some(key))))
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}

fn downcast<S>(instance: Option<Instance>) -> ContainerResult<Option<Arc<S>>>
where
    S: ?Sized + Send + Sync + 'static,
{
    instance.as_ref().map(Instance::downcast::<S>).transpose()
}
