//! Static validation of container registrations.
//!
//! Validation inspects the declared constructor signatures of every
//! implementation registration against what is registered, without
//! constructing anything. It catches configuration mistakes that resolution
//! would otherwise report only as the absent value.
//!
//! Handlers and constructor guard clauses are opaque to validation.

use std::collections::BTreeSet;
use std::fmt;

use crate::constructor::Implementation;
use crate::container::Container;
use crate::key::{Key, ServiceId};
use crate::lifetime::Lifetime;
use crate::registration::Source;

/// Result of validating a container.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// Registrations that can never be constructed
    pub errors: Vec<ValidationError>,
    /// Potentially problematic configurations
    pub warnings: Vec<ValidationWarning>,
}

/// A registration that can never resolve to a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No constructor has all its parameters registered (unkeyed)
    Unsatisfiable {
        service: Key,
        implementation: &'static str,
        /// Unregistered parameter types across all constructors
        missing: Vec<&'static str>,
    },
}

/// A configuration that resolves but is probably not what was meant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// The implementation declares no constructors at all
    NoConstructors {
        service: Key,
        implementation: &'static str,
    },
    /// A singleton will hold on to one instance of a per-request dependency
    SingletonCapturesPerRequest {
        singleton: Key,
        dependency: &'static str,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Unsatisfiable {
                service,
                implementation,
                missing,
            } => write!(
                f,
                "'{}' ({}) has no satisfiable constructor; unregistered: {}",
                service,
                implementation,
                missing.join(", ")
            ),
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::NoConstructors {
                service,
                implementation,
            } => write!(f, "'{}' ({}) declares no constructors", service, implementation),
            ValidationWarning::SingletonCapturesPerRequest { singleton, dependency } => write!(
                f,
                "Singleton '{}' depends on per-request '{}' - will always get same instance",
                singleton, dependency
            ),
        }
    }
}

impl ValidationResult {
    /// Returns true if validation passed without errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns true if there are warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Formats errors and warnings for display.
    pub fn format_issues(&self) -> String {
        let mut output = String::new();

        if !self.errors.is_empty() {
            output.push_str("Validation Errors:\n");
            for error in &self.errors {
                output.push_str(&format!("  - {}\n", error));
            }
        }

        if !self.warnings.is_empty() {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str("Validation Warnings:\n");
            for warning in &self.warnings {
                output.push_str(&format!("  - {}\n", warning));
            }
        }

        output
    }
}

impl Container {
    /// Checks every implementation registration against the registry.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_container::{Constructor, Container, Injectable, ValidationError};
    /// use std::sync::Arc;
    ///
    /// struct Mailer {
    ///     host: Arc<String>,
    /// }
    ///
    /// impl Injectable for Mailer {
    ///     fn constructors() -> Vec<Constructor<Self>> {
    ///         vec![Constructor::unary(|host: Arc<String>| Ok(Mailer { host }))]
    ///     }
    /// }
    ///
    /// let mut container = Container::new();
    /// container.singleton::<Mailer, Mailer>().unwrap();
    ///
    /// let result = container.validate();
    /// assert!(!result.is_valid());
    /// assert!(matches!(&result.errors[0], ValidationError::Unsatisfiable { missing, .. }
    ///     if missing == &vec!["alloc::string::String"]));
    ///
    /// container.instance(Arc::new("smtp.local".to_string())).unwrap();
    /// assert!(container.validate().is_valid());
    /// ```
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        for registration in self.registry().iter() {
            if let Source::Implementation(implementation) = &registration.source {
                self.check_implementation(&registration.key, registration.lifetime, implementation, &mut result);
            }
        }

        result
    }

    fn check_implementation(
        &self,
        key: &Key,
        lifetime: Lifetime,
        implementation: &Implementation,
        result: &mut ValidationResult,
    ) {
        if implementation.constructor_count() == 0 {
            result.warnings.push(ValidationWarning::NoConstructors {
                service: key.clone(),
                implementation: implementation.id().name(),
            });
            return;
        }

        let registered = |param: &ServiceId| self.contains(*param, None);
        let satisfiable = implementation
            .signatures()
            .find(|params| params.iter().all(registered));

        match satisfiable {
            Some(params) if lifetime == Lifetime::Singleton => {
                for param in params {
                    let captures = self
                        .registry()
                        .find(*param, None)
                        .is_some_and(|dep| dep.lifetime == Lifetime::PerRequest);
                    if captures {
                        result.warnings.push(ValidationWarning::SingletonCapturesPerRequest {
                            singleton: key.clone(),
                            dependency: param.name(),
                        });
                    }
                }
            }
            Some(_) => {}
            None => {
                let missing: BTreeSet<&'static str> = implementation
                    .signatures()
                    .flatten()
                    .filter(|param| !registered(*param))
                    .map(|param| param.name())
                    .collect();
                result.errors.push(ValidationError::Unsatisfiable {
                    service: key.clone(),
                    implementation: implementation.id().name(),
                    missing: missing.into_iter().collect(),
                });
            }
        }
    }
}
