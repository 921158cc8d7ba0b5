//! Container options.
//!
//! Options are plain values supplied when the container is created. They can
//! be built in code, overridden from the environment, or (with the `config`
//! feature) deserialized with `serde` from whatever source the host
//! application already uses.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`ContainerOptions::max_depth`].
pub const MAX_DEPTH_ENV: &str = "FERROUS_CONTAINER_MAX_DEPTH";
/// Environment variable overriding [`ContainerOptions::small_threshold`].
pub const SMALL_THRESHOLD_ENV: &str = "FERROUS_CONTAINER_SMALL_THRESHOLD";

/// Tunables for a [`Container`](crate::Container).
///
/// # Examples
///
/// ```
/// use ferrous_container::{Container, ContainerOptions};
///
/// let options = ContainerOptions::default().with_max_depth(64);
/// assert_eq!(options.max_depth, 64);
/// assert_eq!(options.small_threshold, 16);
///
/// let container = Container::with_options(options);
/// assert_eq!(container.options().max_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerOptions {
    /// Maximum number of nested constructions on one thread
    pub max_depth: usize,
    /// Registrations up to this count are looked up by linear scan
    pub small_threshold: usize,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            max_depth: 256,
            small_threshold: 16, // Vec scan beats hashing for small registries
        }
    }
}

impl ContainerOptions {
    /// Defaults overridden by the `FERROUS_CONTAINER_*` environment variables.
    ///
    /// Unset or unparsable variables leave the default in place.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|name| std::env::var(name).ok())
    }

    fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(depth) = parse_positive(lookup(MAX_DEPTH_ENV)) {
            self.max_depth = depth;
        }
        if let Some(threshold) = lookup(SMALL_THRESHOLD_ENV).and_then(|v| v.trim().parse().ok()) {
            self.small_threshold = threshold;
        }
        self
    }

    /// Sets the maximum construction depth. Zero is raised to one.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Sets the linear-scan threshold.
    pub fn with_small_threshold(mut self, small_threshold: usize) -> Self {
        self.small_threshold = small_threshold;
        self
    }
}

fn parse_positive(value: Option<String>) -> Option<usize> {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|v| *v > 0)
}
