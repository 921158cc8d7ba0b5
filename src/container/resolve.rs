//! Resolution and automatic construction.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use super::{ensure_shape, Container};
use crate::constructor::{Arguments, Implementation};
use crate::diagnostics::{RejectedConstructor, ResolutionTrace};
use crate::error::{ContainerError, ContainerResult};
use crate::instance::Instance;
use crate::internal::{trace as rejections, StackGuard};
use crate::key::{Key, ServiceId};
use crate::registration::{Registration, Source};
use crate::traits::ResolverCore;

impl ResolverCore for Container {
    fn resolve_instance(
        &self,
        service: Option<ServiceId>,
        key: Option<&str>,
    ) -> ContainerResult<Option<Instance>> {
        let service = service.ok_or(ContainerError::InvalidArgument("service"))?;

        let Some(registration) = self.registry.find(service, key) else {
            trace!(service = %service, key = ?key, "not registered");
            if self.observers.has_observers() {
                let key = Key::new(service, key);
                self.observers.resolving(&key);
                self.observers.resolved(&key, Duration::ZERO, false);
            }
            return Ok(None);
        };

        // Fast path: fixed instances and materialized singletons
        if let Some(cached) = registration.cached() {
            trace!(service = %registration.key, "cache hit");
            return Ok(Some(cached.clone()));
        }

        self.materialize(registration)
    }
}

impl Container {
    /// Resolves like [`resolve_instance`](ResolverCore::resolve_instance) and
    /// also reports every constructor that was tried and rejected.
    ///
    /// The returned value is exactly what `resolve_instance` would return;
    /// hard errors propagate unchanged.
    pub fn resolve_traced(
        &self,
        service: Option<ServiceId>,
        key: Option<&str>,
    ) -> ContainerResult<ResolutionTrace> {
        let (value, rejections) = rejections::collect(|| self.resolve_instance(service, key));
        Ok(ResolutionTrace {
            value: value?,
            rejections,
        })
    }

    /// Produces a value for a registration whose cache is empty.
    fn materialize(&self, registration: &Registration) -> ContainerResult<Option<Instance>> {
        let key = &registration.key;
        let _guard = StackGuard::enter(self.id, key, self.options.max_depth)?;

        let observed = self.observers.has_observers();
        let start = observed.then(Instant::now);
        if observed {
            self.observers.resolving(key);
        }

        let produced = match &registration.source {
            Source::Handler(factory) => factory(self)?,
            Source::Implementation(implementation) => self.construct(key, implementation)?,
            Source::Fixed => registration.cached().cloned(),
        };

        let value = match produced {
            Some(value) => {
                ensure_shape(key.service(), value.service())?;
                Some(registration.store(value))
            }
            None => {
                trace!(service = %key, "no value produced");
                None
            }
        };

        if let Some(start) = start {
            self.observers.resolved(key, start.elapsed(), value.is_some());
        }
        Ok(value)
    }

    /// Tries each constructor in declaration order; the first that builds wins.
    ///
    /// Parameters are resolved unkeyed, left to right. Hard errors from a
    /// parameter abort the whole resolution; a constructor that declines
    /// (missing argument, guard clause) is recorded and skipped.
    fn construct(&self, key: &Key, implementation: &Implementation) -> ContainerResult<Option<Instance>> {
        for (index, constructor) in implementation.constructors().iter().enumerate() {
            let values = constructor
                .params
                .iter()
                .map(|param| self.resolve_instance(Some(*param), None))
                .collect::<ContainerResult<Vec<_>>>()?;

            let args = Arguments::new(&constructor.params, values);
            match constructor.build(&args) {
                Ok(instance) => return Ok(Some(instance)),
                Err(reason) => self.reject(RejectedConstructor {
                    service: key.clone(),
                    implementation: implementation.id().name(),
                    index,
                    reason,
                }),
            }
        }
        Ok(None)
    }

    fn reject(&self, rejection: RejectedConstructor) {
        debug!(
            service = %rejection.service,
            implementation = rejection.implementation,
            index = rejection.index,
            reason = %rejection.reason,
            "constructor rejected"
        );
        rejections::record(&rejection);
        self.observers.constructor_rejected(&rejection.service, &rejection);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::constructor::{ConstructError, Constructor};
    use crate::internal::circular::depth;
    use crate::registration::Factory;
    use crate::traits::Resolver;

    #[test]
    fn stack_is_empty_after_success_and_failure() {
        let mut container = Container::new();
        container
            .register_singleton(
                Some(ServiceId::of::<u64>()),
                Some(Implementation::from_constructors::<u64, u64>(vec![Constructor::unary(
                    |v: Arc<u32>| Ok(u64::from(*v)),
                )])),
                None,
            )
            .unwrap();

        assert!(container.resolve::<u64>().unwrap().is_none());
        assert_eq!(depth(), 0);

        container.instance(Arc::new(5u32)).unwrap();
        assert_eq!(*container.resolve_required::<u64>().unwrap(), 5);
        assert_eq!(depth(), 0);
    }

    #[test]
    fn handler_with_wrong_shape_is_a_type_mismatch() {
        let factory: Factory =
            Arc::new(|_: &Container| -> ContainerResult<Option<Instance>> { Ok(Some(Instance::from_value(1u8))) });
        let mut container = Container::new();
        container
            .register_handler(Some(ServiceId::of::<u16>()), Some(factory), None)
            .unwrap();
        assert!(matches!(
            container.resolve::<u16>(),
            Err(ContainerError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn absent_handler_result_is_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let factory: Factory = Arc::new(move |_: &Container| -> ContainerResult<Option<Instance>> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        });
        let mut container = Container::new();
        container
            .register_handler(Some(ServiceId::of::<u8>()), Some(factory), None)
            .unwrap();

        assert!(container.resolve::<u8>().unwrap().is_none());
        assert!(container.resolve::<u8>().unwrap().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn rejections_are_traced_in_order() {
        let mut container = Container::new();
        container
            .register_per_request(
                Some(ServiceId::of::<String>()),
                Some(Implementation::from_constructors::<String, String>(vec![
                    Constructor::new(Vec::new(), |_| Err(ConstructError::rejected("first"))),
                    Constructor::unary(|n: Arc<u8>| Ok(n.to_string())),
                    Constructor::nullary(|| "fallback".to_string()),
                ])),
                None,
            )
            .unwrap();

        let traced = container
            .resolve_traced(Some(ServiceId::of::<String>()), None)
            .unwrap();
        assert_eq!(traced.downcast::<String>().unwrap().unwrap().as_str(), "fallback");
        let indexes: Vec<usize> = traced.rejections.iter().map(|r| r.index).collect();
        assert_eq!(indexes, vec![0, 1]);
    }
}
