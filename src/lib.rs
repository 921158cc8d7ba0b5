//! # ferrous-container
//!
//! A keyed inversion-of-control container with automatic constructor
//! selection.
//!
//! ## Features
//!
//! - **Four registration strategies**: fixed instance, singleton, per-request and custom handler
//! - **Keyed registrations**: one service type, several registrations told apart by a string key
//! - **Automatic construction**: declared constructors are tried in order; the first that builds wins
//! - **Trait services**: bind concrete types to `dyn Trait` services with [`implements!`]
//! - **Thread-safe**: register during start-up, then resolve concurrently through `&Container`
//! - **Circular dependency detection**: re-entering a construction is a hard error with the full path
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_container::{Constructor, Container, Injectable, Resolver};
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: Arc<String>,
//! }
//!
//! impl Injectable for Database {
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![Constructor::unary(|url: Arc<String>| Ok(Database { url }))]
//!     }
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! impl Injectable for UserService {
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![Constructor::unary(|db: Arc<Database>| Ok(UserService { db }))]
//!     }
//! }
//!
//! let mut container = Container::new();
//! container
//!     .instance(Arc::new("postgres://localhost".to_string()))?
//!     .singleton::<Database, Database>()?
//!     .per_request::<UserService, UserService>()?;
//!
//! let users = container.resolve_required::<UserService>()?;
//! assert_eq!(users.db.url.as_str(), "postgres://localhost");
//!
//! // Per-request services are fresh; their singleton dependencies are shared
//! let again = container.resolve_required::<UserService>()?;
//! assert!(!Arc::ptr_eq(&users, &again));
//! assert!(Arc::ptr_eq(&users.db, &again.db));
//! # Ok::<(), ferrous_container::ContainerError>(())
//! ```
//!
//! ## Lifetimes
//!
//! - **Fixed**: the value supplied at registration
//! - **Singleton**: constructed on first resolution and cached
//! - **PerRequest**: constructed on every resolution
//!
//! Handlers are cached like singletons.
//!
//! ## Absent values
//!
//! Resolution returns `Ok(None)` when the service is not registered or when
//! no constructor could build it. Constructors decline by returning a
//! [`ConstructError`]; these are never surfaced by `resolve`. Use
//! [`Container::resolve_traced`] or a [`ContainerObserver`] to see why a
//! value is absent.

pub mod config;
pub mod constructor;
pub mod descriptors;
pub mod diagnostics;
pub mod error;
pub mod instance;
pub mod key;
pub mod lifetime;
pub mod observer;
pub mod traits;
pub mod validation;

// Internal modules
mod container;
mod internal;
mod registration;

pub use config::ContainerOptions;
pub use constructor::{Arguments, ConstructError, Constructor, Implementation, Implements, Injectable};
pub use container::Container;
pub use descriptors::ServiceDescriptor;
pub use diagnostics::{RejectedConstructor, ResolutionTrace};
pub use error::{ContainerError, ContainerResult};
pub use instance::Instance;
pub use key::{key_of_type, Key, ServiceId};
pub use lifetime::Lifetime;
pub use observer::{ContainerObserver, TracingObserver};
pub use registration::Factory;
pub use traits::{Resolver, ResolverCore};
pub use validation::{ValidationError, ValidationResult, ValidationWarning};
