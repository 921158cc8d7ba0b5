//! Registration strategies.

/// Registration strategy controlling instance caching behavior
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{Container, Injectable, Constructor, Lifetime, Resolver};
/// use std::sync::Arc;
///
/// struct Clock;
/// impl Injectable for Clock {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::nullary(|| Clock)]
///     }
/// }
///
/// struct Stamp;
/// impl Injectable for Stamp {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::nullary(|| Stamp)]
///     }
/// }
///
/// let mut container = Container::new();
/// container.instance(Arc::new(7u8)).unwrap();
/// container.singleton::<Clock, Clock>().unwrap();
/// container.per_request::<Stamp, Stamp>().unwrap();
///
/// // Fixed: the registered value itself
/// assert_eq!(*container.resolve_required::<u8>().unwrap(), 7);
///
/// // Singleton: built once, then cached
/// let a = container.resolve_required::<Clock>().unwrap();
/// let b = container.resolve_required::<Clock>().unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
///
/// // PerRequest: built on every resolution
/// let x = container.resolve_required::<Stamp>().unwrap();
/// let y = container.resolve_required::<Stamp>().unwrap();
/// assert!(!Arc::ptr_eq(&x, &y));
///
/// let kinds: Vec<Lifetime> = container.descriptors().iter().map(|d| d.lifetime).collect();
/// assert_eq!(kinds, vec![Lifetime::Fixed, Lifetime::Singleton, Lifetime::PerRequest]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// Bound to an already-constructed value at registration time
    Fixed,
    /// Constructed at most once, on first resolution, and cached forever
    ///
    /// Handler registrations use this strategy as well.
    Singleton,
    /// Constructed anew on every resolution, never cached
    PerRequest,
}

impl Lifetime {
    /// Whether a produced value is stored back into the registration.
    pub fn caches(&self) -> bool {
        !matches!(self, Lifetime::PerRequest)
    }
}
