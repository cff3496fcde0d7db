pub mod consts;
pub mod model;

pub use model::{Config, EnginesConfig, LimitsConfig};

use crate::error::{CodesearchError, Result};
use std::path::Path;

impl Config {
    /// Load `codesearch.toml` from `root`, falling back to defaults when absent
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(consts::CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let binaries = [
            ("engines.ripgrep", &self.engines.ripgrep),
            ("engines.git", &self.engines.git),
            ("engines.grep", &self.engines.grep),
            ("engines.ast_grep", &self.engines.ast_grep),
        ];
        for (field, value) in binaries {
            if value.trim().is_empty() {
                return Err(CodesearchError::ConfigInvalid(format!(
                    "{field} must not be empty"
                )));
            }
        }

        let limits = [
            ("limits.max_output_bytes", self.limits.max_output_bytes as u64),
            ("limits.probe_timeout_ms", self.limits.probe_timeout_ms),
            (
                "limits.probe_max_output_bytes",
                self.limits.probe_max_output_bytes as u64,
            ),
            ("limits.kill_grace_ms", self.limits.kill_grace_ms),
        ];
        for (field, value) in limits {
            if value == 0 {
                return Err(CodesearchError::ConfigInvalid(format!(
                    "{field} must be greater than 0"
                )));
            }
        }

        Ok(())
    }
}
