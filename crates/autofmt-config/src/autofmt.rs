use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::logging::LoggingConfig;
use crate::template::TemplateConfig;
use crate::validate;

// ---------------------------------------------------------------------------
// AutofmtConfig
// ---------------------------------------------------------------------------

/// Top-level `autofmt.toml`. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AutofmtConfig {
    pub logging: LoggingConfig,
    pub template: TemplateConfig,
}

impl AutofmtConfig {
    /// Read and parse an `autofmt.toml` file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.as_ref().display()))?;
        let config: Self = content.parse()?;
        tracing::debug!(path = %path.as_ref().display(), rules = config.template.rules.len(), "config loaded");
        Ok(config)
    }
}

impl FromStr for AutofmtConfig {
    type Err = anyhow::Error;

    /// Parse a TOML string into a validated [`AutofmtConfig`].
    fn from_str(toml_str: &str) -> anyhow::Result<Self> {
        let config: AutofmtConfig = toml::from_str(toml_str)?;
        validate::validate(&config)?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
