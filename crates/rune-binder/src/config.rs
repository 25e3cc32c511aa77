//! Binder configuration
//!
//! Read from the `[bind]` table of a `rune.toml` manifest:
//!
//! ```toml
//! [bind]
//! max_signatures_per_function = 128
//! generate_default_methods = false
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Limits and switches of the binding pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindConfig {
    /// Ceiling on distinct signatures of one function
    pub max_signatures_per_function: usize,
    /// Ceiling on distinct classes of one template
    pub max_classes_per_template: usize,
    /// Ceiling on binding executions in one pass
    pub max_binding_runs: usize,
    /// Width of generated object handles
    pub default_ref_width: u32,
    /// Attach `toString` and `show` to classes that do not define them
    pub generate_default_methods: bool,
}

impl Default for BindConfig {
    fn default() -> Self {
        BindConfig {
            max_signatures_per_function: 256,
            max_classes_per_template: 256,
            max_binding_runs: 1_000_000,
            default_ref_width: 32,
            generate_default_methods: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default)]
    bind: BindConfig,
}

impl BindConfig {
    /// Load the `[bind]` table of a manifest file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse the `[bind]` table of a manifest; a missing table yields defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let manifest: Manifest = toml::from_str(content)?;
        manifest.bind.validate()?;
        Ok(manifest.bind)
    }

    /// Reject settings no pass can run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_signatures_per_function == 0 || self.max_classes_per_template == 0 {
            return Err(ConfigError::ValidationError(
                "instantiation limits must be at least 1".to_string(),
            ));
        }
        if self.max_binding_runs == 0 {
            return Err(ConfigError::ValidationError(
                "max_binding_runs must be at least 1".to_string(),
            ));
        }
        if !matches!(self.default_ref_width, 8 | 16 | 32 | 64) {
            return Err(ConfigError::ValidationError(format!(
                "default_ref_width must be 8, 16, 32 or 64, got {}",
                self.default_ref_width
            )));
        }
        Ok(())
    }
}
