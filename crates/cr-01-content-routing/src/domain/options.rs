//! # Call Options
//!
//! Per-call settings for provider lookup and announcement.

use serde::{Deserialize, Serialize};

/// Providers requested when the caller does not say.
pub const DEFAULT_NUM_PROVIDERS: usize = 20;

/// Options for `find_providers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindProvidersOptions {
    /// Upper bound on the number of provider identities returned.
    pub num_providers: usize,
}

impl Default for FindProvidersOptions {
    fn default() -> Self {
        Self {
            num_providers: DEFAULT_NUM_PROVIDERS,
        }
    }
}

impl FindProvidersOptions {
    /// Limit the lookup to `k` providers.
    #[must_use]
    pub fn num_providers(mut self, k: usize) -> Self {
        self.num_providers = k;
        self
    }
}

/// Options for `provide`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvideOptions {
    /// Announce every block reachable from the root, not just the root.
    pub recursive: bool,
}

impl ProvideOptions {
    /// Set recursive announcement.
    #[must_use]
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }
}
