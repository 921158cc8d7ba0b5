//! Error types for the service container.

use crate::key::Key;

/// Container errors
///
/// Represents the failures that can occur while registering or resolving
/// services. Note that resolving an unregistered service is *not* an error:
/// [`resolve_instance`](crate::ResolverCore::resolve_instance) returns
/// `Ok(None)` for that case.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{Container, ContainerError, ServiceId};
/// use std::sync::Arc;
///
/// let mut container = Container::new();
/// container.instance(Arc::new(42u32)).unwrap();
///
/// match container.instance(Arc::new(43u32)) {
///     Err(ContainerError::AlreadyRegistered(key)) => {
///         assert_eq!(key.service(), ServiceId::of::<u32>());
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, thiserror::Error)]
pub enum ContainerError {
    /// A required argument was not supplied
    #[error("Invalid argument: {0} must be provided")]
    InvalidArgument(&'static str),
    /// The (service, key) pair is already taken
    #[error("A registration for {0} already exists")]
    AlreadyRegistered(Key),
    /// A value does not have the shape the caller asked for
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// Required service could not be resolved
    #[error("Service not found: {0}")]
    NotFound(Key),
    /// Circular dependency detected (includes path)
    #[error("Circular dependency: {}", join_path(.0))]
    Circular(Vec<Key>),
    /// Maximum recursion depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
}

fn join_path(path: &[Key]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Result type for container operations
///
/// ```rust
/// use ferrous_container::{ContainerResult, ContainerError};
///
/// fn register() -> ContainerResult<()> {
///     Err(ContainerError::InvalidArgument("service"))
/// }
///
/// assert!(register().is_err());
/// ```
pub type ContainerResult<T> = Result<T, ContainerError>;
