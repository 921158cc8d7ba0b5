//! Diagnostic trace of constructor selection.
//!
//! Resolution deliberately does not distinguish "a dependency is missing" from
//! "a constructor rejected its inputs": both make the container move on to the
//! next constructor, and both end in the absent value when nothing builds.
//! [`Container::resolve_traced`](crate::Container::resolve_traced) keeps the
//! same return contract but also reports every constructor that was tried and
//! rejected along the way.

use std::fmt;
use std::sync::Arc;

use crate::constructor::ConstructError;
use crate::error::ContainerResult;
use crate::instance::Instance;
use crate::key::Key;

/// A constructor that was attempted and declined to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedConstructor {
    /// Registration being resolved when the constructor was tried
    pub service: Key,
    /// Type name of the implementation
    pub implementation: &'static str,
    /// Position of the constructor in declaration order
    pub index: usize,
    /// Why the constructor declined
    pub reason: ConstructError,
}

impl fmt::Display for RejectedConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} constructor #{} for {}: {}",
            self.implementation, self.index, self.service, self.reason
        )
    }
}

/// Outcome of a traced resolution.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{Container, Constructor, ConstructError, Implementation, ServiceId};
/// use std::sync::Arc;
///
/// struct Port(u16);
///
/// let mut container = Container::new();
/// container.register_singleton(
///     Some(ServiceId::of::<Port>()),
///     Some(Implementation::from_constructors::<Port, Port>(vec![
///         Constructor::unary(|raw: Arc<u16>| {
///             if *raw == 0 {
///                 return Err(ConstructError::rejected("port 0 is reserved"));
///             }
///             Ok(Port(*raw))
///         }),
///     ])),
///     None,
/// ).unwrap();
/// container.instance(Arc::new(0u16)).unwrap();
///
/// let trace = container.resolve_traced(Some(ServiceId::of::<Port>()), None).unwrap();
/// assert!(!trace.is_resolved());
/// assert_eq!(trace.rejections.len(), 1);
/// assert_eq!(trace.rejections[0].reason, ConstructError::rejected("port 0 is reserved"));
/// ```
#[derive(Debug, Clone)]
pub struct ResolutionTrace {
    /// The resolved value, exactly as `resolve_instance` would return it
    pub value: Option<Instance>,
    /// Every rejected constructor, in the order they were tried
    pub rejections: Vec<RejectedConstructor>,
}

impl ResolutionTrace {
    /// Whether the resolution produced a value.
    pub fn is_resolved(&self) -> bool {
        self.value.is_some()
    }

    /// The resolved value as `Arc<S>`.
    pub fn downcast<S>(&self) -> ContainerResult<Option<Arc<S>>>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        self.value.as_ref().map(Instance::downcast::<S>).transpose()
    }
}
