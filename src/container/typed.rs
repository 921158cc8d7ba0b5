//! Typed registration helpers.
//!
//! These wrap the `register_*` methods for the common case where the service
//! and implementation types are known at compile time. They return the
//! container so registrations can be chained with `?`.

use std::sync::Arc;

use super::Container;
use crate::constructor::{Implementation, Implements, Injectable};
use crate::error::ContainerResult;
use crate::instance::Instance;
use crate::key::ServiceId;
use crate::registration::Factory;

impl Container {
    /// Registers `value` as the fixed instance of `S`.
    pub fn instance<S>(&mut self, value: Arc<S>) -> ContainerResult<&mut Self>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        self.register_instance(Some(ServiceId::of::<S>()), Some(Instance::new(value)), None)?;
        Ok(self)
    }

    /// Registers `value` as the fixed instance of `S` under `key`.
    pub fn instance_keyed<S>(&mut self, key: &str, value: Arc<S>) -> ContainerResult<&mut Self>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        self.register_instance(Some(ServiceId::of::<S>()), Some(Instance::new(value)), Some(key))?;
        Ok(self)
    }

    /// Registers `T` as the singleton implementation of `S`.
    ///
    /// Use `singleton::<T, T>()` to register a concrete type as itself.
    pub fn singleton<S, T>(&mut self) -> ContainerResult<&mut Self>
    where
        S: ?Sized + Send + Sync + 'static,
        T: Injectable + Implements<S>,
    {
        self.register_singleton(Some(ServiceId::of::<S>()), Some(Implementation::bind::<S, T>()), None)?;
        Ok(self)
    }

    /// Registers `T` as the singleton implementation of `S` under `key`.
    pub fn singleton_keyed<S, T>(&mut self, key: &str) -> ContainerResult<&mut Self>
    where
        S: ?Sized + Send + Sync + 'static,
        T: Injectable + Implements<S>,
    {
        self.register_singleton(
            Some(ServiceId::of::<S>()),
            Some(Implementation::bind::<S, T>()),
            Some(key),
        )?;
        Ok(self)
    }

    /// Registers `T` as the per-request implementation of `S`.
    pub fn per_request<S, T>(&mut self) -> ContainerResult<&mut Self>
    where
        S: ?Sized + Send + Sync + 'static,
        T: Injectable + Implements<S>,
    {
        self.register_per_request(Some(ServiceId::of::<S>()), Some(Implementation::bind::<S, T>()), None)?;
        Ok(self)
    }

    /// Registers `T` as the per-request implementation of `S` under `key`.
    pub fn per_request_keyed<S, T>(&mut self, key: &str) -> ContainerResult<&mut Self>
    where
        S: ?Sized + Send + Sync + 'static,
        T: Injectable + Implements<S>,
    {
        self.register_per_request(
            Some(ServiceId::of::<S>()),
            Some(Implementation::bind::<S, T>()),
            Some(key),
        )?;
        Ok(self)
    }

    /// Registers a typed handler for `S`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_container::{Container, Resolver};
    /// use std::sync::Arc;
    ///
    /// let mut container = Container::new();
    /// container.instance(Arc::new(8080u16)).unwrap();
    /// container
    ///     .handler(|c: &Container| {
    ///         let port = c.resolve_required::<u16>()?;
    ///         Ok(Some(Arc::new(format!("localhost:{port}"))))
    ///     })
    ///     .unwrap();
    ///
    /// assert_eq!(container.resolve_required::<String>().unwrap().as_str(), "localhost:8080");
    /// ```
    pub fn handler<S, F>(&mut self, handler: F) -> ContainerResult<&mut Self>
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&Container) -> ContainerResult<Option<Arc<S>>> + Send + Sync + 'static,
    {
        self.register_handler(Some(ServiceId::of::<S>()), Some(erase(handler)), None)?;
        Ok(self)
    }

    /// Registers a typed handler for `S` under `key`.
    pub fn handler_keyed<S, F>(&mut self, key: &str, handler: F) -> ContainerResult<&mut Self>
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&Container) -> ContainerResult<Option<Arc<S>>> + Send + Sync + 'static,
    {
        self.register_handler(Some(ServiceId::of::<S>()), Some(erase(handler)), Some(key))?;
        Ok(self)
    }
}

fn erase<S, F>(handler: F) -> Factory
where
    S: ?Sized + Send + Sync + 'static,
    F: Fn(&Container) -> ContainerResult<Option<Arc<S>>> + Send + Sync + 'static,
{
    Arc::new(move |container: &Container| Ok(handler(container)?.map(Instance::new::<S>)))
}
