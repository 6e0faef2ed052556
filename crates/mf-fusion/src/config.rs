//! Configuration for the fusion engine
//!
//! # Example
//!
//! ```
//! use mf_fusion::{FusionConfigBuilder, RejectPolicy};
//!
//! let config = FusionConfigBuilder::new()
//!     .max_variant_len(4)
//!     .reject_policy(RejectPolicy::SkipWindow)
//!     .build()
//!     .expect("valid config");
//! assert_eq!(config.max_variant_len, 4);
//! ```

use crate::domain::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Upper bound accepted for `max_variant_len`
pub const MAX_VARIANT_LEN_LIMIT: usize = 64;

/// Where scanning resumes after a constraint rejects a match
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectPolicy {
    /// Emit the window's first instruction and retry at start + 1
    #[default]
    NextInstruction,
    /// Emit the whole window unchanged and resume after it
    SkipWindow,
}

/// What happens to a partial match still pending at end of stream
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndOfStreamPolicy {
    /// Emit the pending window unchanged
    #[default]
    Flush,
    /// Retry matching at start + 1 inside the pending window
    Rescan,
}

/// Engine configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Widest window the machine can fuse
    pub max_variant_len: usize,
    /// Resume point after a rejected match
    pub reject_policy: RejectPolicy,
    /// Handling of an unfinished match at end of stream
    pub end_of_stream: EndOfStreamPolicy,
    /// Emit a debug event per accepted/rejected match
    pub log_matches: bool,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            max_variant_len: 8,
            reject_policy: RejectPolicy::default(),
            end_of_stream: EndOfStreamPolicy::default(),
            log_matches: true,
        }
    }
}

impl FusionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_variant_len == 0 {
            return Err(ConfigError::InvalidConfig(
                "max_variant_len cannot be 0".to_string(),
            ));
        }

        if self.max_variant_len > MAX_VARIANT_LEN_LIMIT {
            return Err(ConfigError::InvalidConfig(format!(
                "max_variant_len {} exceeds limit {}",
                self.max_variant_len, MAX_VARIANT_LEN_LIMIT
            )));
        }

        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing fields default.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ConfigError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Builder for FusionConfig with validation
#[derive(Default)]
pub struct FusionConfigBuilder {
    max_variant_len: Option<usize>,
    reject_policy: Option<RejectPolicy>,
    end_of_stream: Option<EndOfStreamPolicy>,
    log_matches: Option<bool>,
}

impl FusionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_variant_len(mut self, len: usize) -> Self {
        self.max_variant_len = Some(len);
        self
    }

    pub fn reject_policy(mut self, policy: RejectPolicy) -> Self {
        self.reject_policy = Some(policy);
        self
    }

    pub fn end_of_stream(mut self, policy: EndOfStreamPolicy) -> Self {
        self.end_of_stream = Some(policy);
        self
    }

    pub fn log_matches(mut self, enabled: bool) -> Self {
        self.log_matches = Some(enabled);
        self
    }

    /// Build the FusionConfig, validating all parameters
    pub fn build(self) -> Result<FusionConfig, ConfigError> {
        let defaults = FusionConfig::default();

        let config = FusionConfig {
            max_variant_len: self.max_variant_len.unwrap_or(defaults.max_variant_len),
            reject_policy: self.reject_policy.unwrap_or(defaults.reject_policy),
            end_of_stream: self.end_of_stream.unwrap_or(defaults.end_of_stream),
            log_matches: self.log_matches.unwrap_or(defaults.log_matches),
        };

        config.validate()?;
        Ok(config)
    }
}
