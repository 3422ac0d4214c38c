//! Repository configuration.
//!
//! ```toml
//! default_page_limit = 50
//! max_page_limit = 500
//! log_partial_failures = true
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_PAGE_LIMIT: usize = 20;
const MAX_PAGE_LIMIT: usize = 1000;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse repository config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid repository config: {0}")]
    Invalid(String),
}

/// Tunables shared by every repository built from one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Page size used by `Repository::first_page`.
    pub default_page_limit: usize,
    /// Largest page size `paginate` accepts.
    pub max_page_limit: usize,
    /// Log the error swallowed by a partially successful bulk create.
    pub log_partial_failures: bool,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            default_page_limit: DEFAULT_PAGE_LIMIT,
            max_page_limit: MAX_PAGE_LIMIT,
            log_partial_failures: true,
        }
    }
}

impl RepositoryConfig {
    /// Parse and validate a TOML document. Missing keys take defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: RepositoryConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_page_limit == 0 {
            return Err(ConfigError::Invalid("max_page_limit must be at least 1".into()));
        }
        if self.default_page_limit == 0 || self.default_page_limit > self.max_page_limit {
            return Err(ConfigError::Invalid(format!(
                "default_page_limit must be between 1 and {}, got {}",
                self.max_page_limit, self.default_page_limit
            )));
        }
        Ok(())
    }

    pub fn with_default_page_limit(mut self, limit: usize) -> Self {
        self.default_page_limit = limit;
        self
    }

    pub fn with_max_page_limit(mut self, limit: usize) -> Self {
        self.max_page_limit = limit;
        self
    }

    pub fn with_log_partial_failures(mut self, enabled: bool) -> Self {
        self.log_partial_failures = enabled;
        self
    }
}
