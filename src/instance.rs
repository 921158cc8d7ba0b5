//! Type-erased service values.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{ContainerError, ContainerResult};
use crate::key::ServiceId;

// Type-erased Arc for storage; always holds an `Arc<S>` for the shape `S`
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

/// A resolved or registered service value.
///
/// An `Instance` is a cheap-to-clone handle around an `Arc<S>` together with
/// the identity of `S`, the service shape the value was built for. The
/// container stores every value in this form, so trait-object services
/// (`Arc<dyn Trait>`) and concrete services share one representation.
///
/// Cloning an `Instance` never clones the value: all clones point to the
/// same allocation.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{Instance, ServiceId};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
/// struct English;
/// impl Greeter for English {
///     fn greet(&self) -> String { "hello".into() }
/// }
///
/// let instance = Instance::new::<dyn Greeter>(Arc::new(English));
/// assert_eq!(instance.service(), ServiceId::of::<dyn Greeter>());
///
/// let greeter = instance.downcast::<dyn Greeter>().unwrap();
/// assert_eq!(greeter.greet(), "hello");
///
/// // Asking for another shape is an explicit error
/// assert!(instance.downcast::<English>().is_err());
/// ```
#[derive(Clone)]
pub struct Instance {
    service: ServiceId,
    value: AnyArc,
}

impl Instance {
    /// Wraps a shared value shaped for service `S`.
    pub fn new<S>(value: Arc<S>) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
    {
        Self {
            service: ServiceId::of::<S>(),
            value: Arc::new(value),
        }
    }

    /// Wraps an owned value, shaped for its own type.
    pub fn from_value<T: Send + Sync + 'static>(value: T) -> Self {
        Self::new(Arc::new(value))
    }

    /// The service shape this value was built for.
    pub fn service(&self) -> ServiceId {
        self.service
    }

    /// Recovers the shared value as `Arc<S>`.
    ///
    /// Fails with [`ContainerError::TypeMismatch`] when the instance was not
    /// built for `S`.
    pub fn downcast<S>(&self) -> ContainerResult<Arc<S>>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        self.value
            .downcast_ref::<Arc<S>>()
            .cloned()
            .ok_or(ContainerError::TypeMismatch {
                expected: std::any::type_name::<S>(),
                found: self.service.name(),
            })
    }

    /// Whether both handles point to the same underlying value.
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("service", &self.service.name())
            .finish_non_exhaustive()
    }
}
