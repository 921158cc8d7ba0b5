//! Explicit constructors used for automatic dependency construction.
//!
//! Rust has no runtime reflection over constructor signatures, so every
//! constructible type declares its constructors up front: the parameter
//! identities the container must resolve, and a build function that receives
//! the resolved arguments. The container tries the constructors in
//! declaration order and uses the first one that builds successfully.

use std::sync::Arc;

use crate::instance::Instance;
use crate::key::ServiceId;

/// Reason a constructor declined to build a value.
///
/// Constructor failures are part of normal overload selection: the container
/// swallows them and moves on to the next constructor. They are reported
/// through [`ContainerObserver`](crate::ContainerObserver)s, `tracing` and
/// [`Container::resolve_traced`](crate::Container::resolve_traced), never
/// through `resolve`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstructError {
    /// A declared parameter could not be resolved
    #[error("argument {index} ({service}) could not be resolved")]
    MissingArgument { index: usize, service: &'static str },
    /// The build function asked for an argument with a type other than declared
    #[error("argument {index} was declared as {declared} but requested as {requested}")]
    ArgumentMismatch {
        index: usize,
        declared: &'static str,
        requested: &'static str,
    },
    /// The build function rejected its inputs
    #[error("{0}")]
    Rejected(String),
}

impl ConstructError {
    /// Convenience for guard clauses inside build functions.
    pub fn rejected(reason: impl Into<String>) -> Self {
        ConstructError::Rejected(reason.into())
    }
}

/// Resolved argument list handed to a constructor's build function.
///
/// Each declared parameter has been resolved (unkeyed) before the build
/// function runs. A parameter whose service is not registered, or whose
/// construction failed, is absent.
pub struct Arguments<'a> {
    params: &'a [ServiceId],
    values: Vec<Option<Instance>>,
}

impl<'a> Arguments<'a> {
    pub(crate) fn new(params: &'a [ServiceId], values: Vec<Option<Instance>>) -> Self {
        debug_assert_eq!(params.len(), values.len());
        Self { params, values }
    }

    /// Number of declared parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether the constructor takes no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// The argument at `index`, which must be present.
    pub fn get<S>(&self, index: usize) -> Result<Arc<S>, ConstructError>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        self.optional::<S>(index)?.ok_or(ConstructError::MissingArgument {
            index,
            service: std::any::type_name::<S>(),
        })
    }

    /// The argument at `index`, or `None` when it could not be resolved.
    pub fn optional<S>(&self, index: usize) -> Result<Option<Arc<S>>, ConstructError>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        let declared = match self.params.get(index) {
            Some(declared) => *declared,
            None => {
                return Err(ConstructError::MissingArgument {
                    index,
                    service: std::any::type_name::<S>(),
                })
            }
        };
        let requested = ServiceId::of::<S>();
        if declared != requested {
            return Err(ConstructError::ArgumentMismatch {
                index,
                declared: declared.name(),
                requested: requested.name(),
            });
        }
        match &self.values[index] {
            Some(instance) => instance.downcast::<S>().map(Some).map_err(|_| {
                ConstructError::ArgumentMismatch {
                    index,
                    declared: declared.name(),
                    requested: instance.service().name(),
                }
            }),
            None => Ok(None),
        }
    }
}

type BuildFn<T> = dyn Fn(&Arguments<'_>) -> Result<T, ConstructError> + Send + Sync;

/// One constructor of a type: its parameter identities and a build function.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{Constructor, ConstructError, ServiceId};
/// use std::sync::Arc;
///
/// struct Credentials { username: String }
///
/// struct User {
///     name: Arc<String>,
///     credentials: Arc<Credentials>,
/// }
///
/// // Typed helper: each parameter must resolve
/// let strict = Constructor::binary(|name: Arc<String>, credentials: Arc<Credentials>| {
///     Ok(User { name, credentials })
/// });
/// assert_eq!(strict.params(), &[ServiceId::of::<String>(), ServiceId::of::<Credentials>()]);
///
/// // Free form: optional parameters and guard clauses
/// let lenient = Constructor::new(vec![ServiceId::of::<String>()], |args| {
///     let name = args.optional::<String>(0)?
///         .unwrap_or_else(|| Arc::new("guest".to_string()));
///     if name.is_empty() {
///         return Err(ConstructError::rejected("name must not be empty"));
///     }
///     let credentials = Arc::new(Credentials { username: name.to_string() });
///     Ok(User { name, credentials })
/// });
/// assert_eq!(lenient.params().len(), 1);
/// ```
pub struct Constructor<T> {
    params: Vec<ServiceId>,
    build: Box<BuildFn<T>>,
}

impl<T: 'static> Constructor<T> {
    /// A constructor with explicitly declared parameters.
    pub fn new<F>(params: Vec<ServiceId>, build: F) -> Self
    where
        F: Fn(&Arguments<'_>) -> Result<T, ConstructError> + Send + Sync + 'static,
    {
        Self {
            params,
            build: Box::new(build),
        }
    }

    /// A parameterless constructor.
    pub fn nullary<F>(build: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::new(Vec::new(), move |_| Ok(build()))
    }

    /// A constructor taking one resolved dependency.
    pub fn unary<A, F>(build: F) -> Self
    where
        A: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<A>) -> Result<T, ConstructError> + Send + Sync + 'static,
    {
        Self::new(vec![ServiceId::of::<A>()], move |args| build(args.get::<A>(0)?))
    }

    /// A constructor taking two resolved dependencies.
    pub fn binary<A, B, F>(build: F) -> Self
    where
        A: ?Sized + Send + Sync + 'static,
        B: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<A>, Arc<B>) -> Result<T, ConstructError> + Send + Sync + 'static,
    {
        Self::new(
            vec![ServiceId::of::<A>(), ServiceId::of::<B>()],
            move |args| build(args.get::<A>(0)?, args.get::<B>(1)?),
        )
    }

    /// A constructor taking three resolved dependencies.
    pub fn ternary<A, B, C, F>(build: F) -> Self
    where
        A: ?Sized + Send + Sync + 'static,
        B: ?Sized + Send + Sync + 'static,
        C: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<A>, Arc<B>, Arc<C>) -> Result<T, ConstructError> + Send + Sync + 'static,
    {
        Self::new(
            vec![ServiceId::of::<A>(), ServiceId::of::<B>(), ServiceId::of::<C>()],
            move |args| build(args.get::<A>(0)?, args.get::<B>(1)?, args.get::<C>(2)?),
        )
    }

    /// Declared parameter identities, in order.
    pub fn params(&self) -> &[ServiceId] {
        &self.params
    }
}

/// A type the container can construct on its own.
///
/// Constructors are tried in the order returned; the first one that builds
/// wins. An empty list makes the type unconstructible, and resolving it
/// yields the absent value.
pub trait Injectable: Sized + Send + Sync + 'static {
    /// The constructors of this type, in declaration order.
    fn constructors() -> Vec<Constructor<Self>>;
}

/// Conversion from a concrete implementation to the service it is bound to.
///
/// Every type implements its own identity conversion. Trait-object services
/// are declared with [`implements!`](crate::implements).
pub trait Implements<S: ?Sized>: Send + Sync + 'static {
    /// Converts the shared implementation into the service shape.
    fn upcast(self: Arc<Self>) -> Arc<S>;
}

impl<T: Send + Sync + 'static> Implements<T> for T {
    fn upcast(self: Arc<Self>) -> Arc<T> {
        self
    }
}

/// Declares that a concrete type can be bound to one or more trait services.
///
/// ```rust
/// use ferrous_container::{implements, Implements};
/// use std::sync::Arc;
///
/// trait Named: Send + Sync { fn name(&self) -> &str; }
/// struct Admin;
/// impl Named for Admin { fn name(&self) -> &str { "admin" } }
///
/// implements!(Admin => dyn Named);
///
/// let named: Arc<dyn Named> = Implements::<dyn Named>::upcast(Arc::new(Admin));
/// assert_eq!(named.name(), "admin");
/// ```
#[macro_export]
macro_rules! implements {
    ($implementation:ty => $($service:ty),+ $(,)?) => {
        $(
            impl $crate::Implements<$service> for $implementation {
                fn upcast(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$service> {
                    self
                }
            }
        )+
    };
}

type ErasedBuildFn = dyn Fn(&Arguments<'_>) -> Result<Instance, ConstructError> + Send + Sync;

/// Type-erased constructor producing service-shaped instances.
pub(crate) struct ErasedConstructor {
    pub(crate) params: Vec<ServiceId>,
    build: Box<ErasedBuildFn>,
}

impl ErasedConstructor {
    pub(crate) fn build(&self, args: &Arguments<'_>) -> Result<Instance, ConstructError> {
        (self.build)(args)
    }
}

/// A constructible implementation bound to the service shape it produces.
///
/// This is the implementation argument of
/// [`Container::register_singleton`](crate::Container::register_singleton) and
/// [`Container::register_per_request`](crate::Container::register_per_request).
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{implements, Constructor, Implementation, Injectable, ServiceId};
///
/// trait Store: Send + Sync {}
/// struct MemoryStore;
/// impl Store for MemoryStore {}
/// implements!(MemoryStore => dyn Store);
///
/// impl Injectable for MemoryStore {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::nullary(|| MemoryStore)]
///     }
/// }
///
/// let implementation = Implementation::bind::<dyn Store, MemoryStore>();
/// assert_eq!(implementation.id(), ServiceId::of::<MemoryStore>());
/// assert_eq!(implementation.service(), ServiceId::of::<dyn Store>());
/// assert_eq!(implementation.constructor_count(), 1);
/// ```
#[derive(Clone)]
pub struct Implementation {
    id: ServiceId,
    service: ServiceId,
    constructors: Arc<[ErasedConstructor]>,
}

impl Implementation {
    /// `T` bound to itself, using its declared constructors.
    pub fn of<T: Injectable>() -> Self {
        Self::bind::<T, T>()
    }

    /// `T` bound to service `S`, using its declared constructors.
    pub fn bind<S, T>() -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        T: Injectable + Implements<S>,
    {
        Self::from_constructors::<S, T>(T::constructors())
    }

    /// `T` bound to service `S` with an explicit constructor list.
    pub fn from_constructors<S, T>(constructors: Vec<Constructor<T>>) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        T: Implements<S>,
    {
        let constructors = constructors
            .into_iter()
            .map(|ctor| {
                let Constructor { params, build } = ctor;
                ErasedConstructor {
                    params,
                    build: Box::new(move |args: &Arguments<'_>| {
                        let value = build(args)?;
                        Ok(Instance::new::<S>(<T as Implements<S>>::upcast(Arc::new(value))))
                    }),
                }
            })
            .collect::<Vec<_>>();

        Self {
            id: ServiceId::of::<T>(),
            service: ServiceId::of::<S>(),
            constructors: constructors.into(),
        }
    }

    /// Identity of the concrete implementation type.
    pub fn id(&self) -> ServiceId {
        self.id
    }

    /// Identity of the service shape produced by the constructors.
    pub fn service(&self) -> ServiceId {
        self.service
    }

    /// Number of declared constructors.
    pub fn constructor_count(&self) -> usize {
        self.constructors.len()
    }

    /// Declared parameters of each constructor, in declaration order.
    pub fn signatures(&self) -> impl Iterator<Item = &[ServiceId]> + '_ {
        self.constructors.iter().map(|ctor| ctor.params.as_slice())
    }

    pub(crate) fn constructors(&self) -> &[ErasedConstructor] {
        &self.constructors
    }
}

impl std::fmt::Debug for Implementation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Implementation")
            .field("id", &self.id.name())
            .field("service", &self.service.name())
            .field("constructors", &self.constructors.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair(Arc<u8>, Arc<String>);

    fn args<'a>(params: &'a [ServiceId], values: Vec<Option<Instance>>) -> Arguments<'a> {
        Arguments::new(params, values)
    }

    #[test]
    fn binary_builds_from_present_arguments() {
        let ctor = Constructor::binary(|a: Arc<u8>, b: Arc<String>| Ok(Pair(a, b)));
        let params = ctor.params().to_vec();
        let values = vec![
            Some(Instance::from_value(7u8)),
            Some(Instance::from_value("seven".to_string())),
        ];
        let pair = (ctor.build)(&args(&params, values)).unwrap();
        assert_eq!(*pair.0, 7);
        assert_eq!(pair.1.as_str(), "seven");
    }

    #[test]
    fn missing_argument_rejects() {
        let ctor = Constructor::binary(|a: Arc<u8>, b: Arc<String>| Ok(Pair(a, b)));
        let params = ctor.params().to_vec();
        let values = vec![Some(Instance::from_value(7u8)), None];
        let err = (ctor.build)(&args(&params, values)).err().unwrap();
        assert_eq!(
            err,
            ConstructError::MissingArgument {
                index: 1,
                service: "alloc::string::String"
            }
        );
    }

    #[test]
    fn undeclared_type_is_a_mismatch() {
        let ctor = Constructor::new(vec![ServiceId::of::<u8>()], |args| {
            let value = args.get::<u16>(0)?;
            Ok(*value)
        });
        let params = ctor.params().to_vec();
        let values = vec![Some(Instance::from_value(7u8))];
        assert!(matches!(
            (ctor.build)(&args(&params, values)),
            Err(ConstructError::ArgumentMismatch { index: 0, .. })
        ));
    }

    #[test]
    fn optional_argument_may_be_absent() {
        let ctor = Constructor::new(vec![ServiceId::of::<u8>()], |args| {
            Ok(args.optional::<u8>(0)?.map(|v| *v).unwrap_or(0))
        });
        let params = ctor.params().to_vec();
        assert_eq!((ctor.build)(&args(&params, vec![None])).unwrap(), 0);
    }

    #[test]
    fn erased_constructor_produces_service_shape() {
        trait Shape: Send + Sync {
            fn sides(&self) -> u8;
        }
        struct Square;
        impl Shape for Square {
            fn sides(&self) -> u8 {
                4
            }
        }
        crate::implements!(Square => dyn Shape);

        let implementation = Implementation::from_constructors::<dyn Shape, Square>(vec![
            Constructor::nullary(|| Square),
        ]);
        let ctor = &implementation.constructors()[0];
        let instance = ctor.build(&args(&[], Vec::new())).unwrap();
        assert_eq!(instance.service(), ServiceId::of::<dyn Shape>());
        assert_eq!(instance.downcast::<dyn Shape>().unwrap().sides(), 4);
    }
}
