//! # Content Routing Configuration
//!
//! Tunables for the content-routing service, loadable from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};
use shared_bus::DEFAULT_CHANNEL_CAPACITY;

use crate::domain::{ConfigError, DEFAULT_NUM_PROVIDERS, DEFAULT_TRAVERSAL_CONCURRENCY};

/// Content routing configuration.
///
/// Keys missing from a TOML document take their default values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentRoutingConfig {
    /// Providers requested when `find_providers` is called without options.
    pub default_num_providers: usize,

    /// DAG node fetches in flight during recursive provide.
    pub traversal_concurrency: usize,

    /// Events buffered per query operation before publishers wait.
    pub event_channel_capacity: usize,

    /// Results buffered per output stream before the consumer waits.
    pub output_channel_capacity: usize,
}

impl Default for ContentRoutingConfig {
    fn default() -> Self {
        Self {
            default_num_providers: DEFAULT_NUM_PROVIDERS,
            traversal_concurrency: DEFAULT_TRAVERSAL_CONCURRENCY,
            event_channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            output_channel_capacity: 1,
        }
    }
}

impl ContentRoutingConfig {
    /// Create a config for testing (smaller values).
    pub fn for_testing() -> Self {
        Self {
            default_num_providers: 5,
            traversal_concurrency: 2,
            event_channel_capacity: 4,
            output_channel_capacity: 1,
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject values the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_zero = [
            ("default_num_providers", self.default_num_providers),
            ("traversal_concurrency", self.traversal_concurrency),
            ("event_channel_capacity", self.event_channel_capacity),
            ("output_channel_capacity", self.output_channel_capacity),
        ];
        for (field, value) in non_zero {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be greater than 0".into(),
                });
            }
        }
        Ok(())
    }
}
