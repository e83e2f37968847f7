// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::error::ConfigError;
use crate::model::Locale;
use crate::parser::locale::{LocaleRegistry, PipelineOverrides};
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Contents of `capture.toml`.
///
/// ```toml
/// locale = "zh"
///
/// [pipelines.en]
/// disabled_extractors = ["priority-extractor"]
/// extractor_order = ["project-extractor"]
/// ```
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Capture language; the OS locale when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,
    /// Pipeline overrides keyed by locale tag ("en", "zh").
    #[serde(default)]
    pub pipelines: BTreeMap<String, PipelineOverrides>,
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;
        Self::load_from_path(&path)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        // Explicitly detect missing file so callers can fall back to defaults.
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        Self::from_toml_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(config) => Ok(config),
            Err(e) if Self::is_missing_config_error(&e) => {
                log::debug!("No capture config found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Whether `err` means the config file does not exist, either from our
    /// explicit message or an underlying IO NotFound anywhere in the chain.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }
        err.chain().any(|cause| {
            cause
                .downcast_ref::<std::io::Error>()
                .is_some_and(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
        })
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&path, toml_str)?;
        Ok(())
    }

    /// Get the path string using an explicit context.
    pub fn get_path_string(ctx: &dyn AppContext) -> Result<String> {
        let path = ctx.get_config_file_path()?;
        Ok(path.to_string_lossy().to_string())
    }

    pub fn effective_locale(&self) -> Locale {
        self.locale.unwrap_or_else(Locale::system)
    }

    /// Overrides keyed by locale; unknown locale tags are configuration errors.
    pub fn overrides(&self) -> Result<HashMap<Locale, PipelineOverrides>, ConfigError> {
        self.pipelines
            .iter()
            .map(|(tag, overrides)| {
                let locale = Locale::from_str(tag).map_err(|_| ConfigError::UnknownLocale(tag.clone()))?;
                Ok((locale, overrides.clone()))
            })
            .collect()
    }

    /// Builds the pipelines for every locale with this file's overrides applied.
    pub fn build_registry(&self) -> Result<LocaleRegistry, ConfigError> {
        LocaleRegistry::new(&self.overrides()?)
    }
}
