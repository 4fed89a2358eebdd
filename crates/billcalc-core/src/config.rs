//! # Engine Configuration
//!
//! Settings that change how bills are built and presented. The arithmetic
//! itself has no knobs.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BILLCALC_EMPTY_BILL_POLICY=zero_share                              │
//! │     BILLCALC_ROUNDING_SCALE=2                                          │
//! │     BILLCALC_MAX_ITEMS=1000                                            │
//! │                                                                         │
//! │  2. TOML Config File (path supplied by the host application)           │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     Reject, 2 decimal places, 1000 items                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # billcalc.toml
//! empty_bill_policy = "reject"  # reject | zero_share
//! rounding_scale = 2
//! max_items = 1000
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::types::EmptyBillPolicy;
use crate::MAX_BILL_ITEMS;

/// Environment variable overriding [`EngineConfig::empty_bill_policy`].
pub const ENV_EMPTY_BILL_POLICY: &str = "BILLCALC_EMPTY_BILL_POLICY";
/// Environment variable overriding [`EngineConfig::rounding_scale`].
pub const ENV_ROUNDING_SCALE: &str = "BILLCALC_ROUNDING_SCALE";
/// Environment variable overriding [`EngineConfig::max_items`].
pub const ENV_MAX_ITEMS: &str = "BILLCALC_MAX_ITEMS";

/// Largest accepted rounding scale.
pub const MAX_ROUNDING_SCALE: u32 = 10;

// =============================================================================
// Engine Configuration
// =============================================================================

/// Bill engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// What to do with an additional discount on a bill with no items.
    #[serde(default)]
    pub empty_bill_policy: EmptyBillPolicy,

    /// Decimal places used when presenting totals.
    #[serde(default = "default_rounding_scale")]
    pub rounding_scale: u32,

    /// Maximum number of items accepted on one bill.
    #[serde(default = "default_max_items")]
    pub max_items: usize,
}

fn default_rounding_scale() -> u32 {
    2
}

fn default_max_items() -> usize {
    MAX_BILL_ITEMS
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            empty_bill_policy: EmptyBillPolicy::default(),
            rounding_scale: default_rounding_scale(),
            max_items: default_max_items(),
        }
    }
}

impl EngineConfig {
    /// Parses a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let config: EngineConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file, when a path is given and the file exists
    /// 3. Environment variables
    pub fn load(config_path: Option<&Path>) -> ConfigResult<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// [`EngineConfig::load`] with overrides read through `lookup` instead
    /// of the process environment.
    pub fn load_with<F>(config_path: Option<&Path>, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = config_path {
            if path.exists() {
                info!(?path, "Loading engine config from file");
                let contents = std::fs::read_to_string(path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(lookup);
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<&Path>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load engine config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_items == 0 {
            return Err(ConfigError::Invalid(
                "max_items must be greater than 0".into(),
            ));
        }

        if self.rounding_scale > MAX_ROUNDING_SCALE {
            return Err(ConfigError::Invalid(format!(
                "rounding_scale must be at most {}, got {}",
                MAX_ROUNDING_SCALE, self.rounding_scale
            )));
        }

        Ok(())
    }

    /// Applies overrides from any key lookup. Unparseable values are logged
    /// and ignored.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(policy) = lookup(ENV_EMPTY_BILL_POLICY) {
            match policy.parse::<EmptyBillPolicy>() {
                Ok(parsed) => {
                    debug!(policy = %parsed, "Overriding empty bill policy from environment");
                    self.empty_bill_policy = parsed;
                }
                Err(e) => warn!(policy = %policy, error = %e, "Unknown empty bill policy in environment"),
            }
        }

        if let Some(scale) = lookup(ENV_ROUNDING_SCALE) {
            if let Ok(s) = scale.trim().parse::<u32>() {
                debug!(scale = s, "Overriding rounding scale from environment");
                self.rounding_scale = s;
            } else {
                warn!(scale = %scale, "Invalid rounding scale in environment");
            }
        }

        if let Some(max) = lookup(ENV_MAX_ITEMS) {
            if let Ok(m) = max.trim().parse::<usize>() {
                debug!(max_items = m, "Overriding max items from environment");
                self.max_items = m;
            } else {
                warn!(max_items = %max, "Invalid max items in environment");
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
