//! Configuration for a mapping validation pass.

/// Switches controlling which checks a [`crate::validation::MappingValidator`] pass
/// performs and how it schedules the per-class work.
///
/// Both check categories default to enabled; disabling one is a performance or
/// triage tool, not a correctness mode. Parallel scheduling never changes the
/// output — results are merged in universe registration order either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Check each participant type against its declared contract interface
    /// (property presence by name and exact type) before flattening validation
    pub enable_contract_validation: bool,

    /// Run the reachability analysis over removed properties' accessors
    pub enable_reachability_validation: bool,

    /// Distribute per-class validation across a rayon thread pool
    pub parallel: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enable_contract_validation: true,
            enable_reachability_validation: true,
            parallel: true,
        }
    }
}

impl ValidationConfig {
    /// Creates a configuration with all checks disabled.
    ///
    /// Every pass under this configuration produces an empty report; useful for
    /// measuring enumeration overhead in isolation.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enable_contract_validation: false,
            enable_reachability_validation: false,
            parallel: false,
        }
    }

    /// Creates the default configuration with parallel scheduling turned off.
    ///
    /// Output is identical to the parallel run; this exists for deterministic
    /// profiling and for single-threaded host environments.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }
}
