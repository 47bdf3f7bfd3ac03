//! Serializable slippage model configuration.
//!
//! A config file lists models as TOML tables:
//!
//! ```toml
//! [[models]]
//! model_type = "fixed_percent"
//! name = "tight"
//! params = { p = 0.0005 }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::params::{ParamValue, Params};

/// Errors raised while loading a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid slippage config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration of a single slippage model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlippageConfig {
    /// Built-in kind (`fixed_percent`, `fixed_value`) or a registered custom kind.
    pub model_type: String,
    /// Model name. Defaults to the model's own default name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub params: Params,
}

impl SlippageConfig {
    pub fn new(model_type: impl Into<String>) -> Self {
        Self {
            model_type: model_type.into(),
            name: None,
            params: Params::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a parameter, replacing any previous value for `key`.
    pub fn with_param(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key, value);
        self
    }

    /// Deterministic identity of this config: blake3 of its TOML form.
    ///
    /// Parameter keys are sorted (`BTreeMap`), so equal configs hash equal.
    /// TOML spells `nan`, `inf` and `-inf` out, so non-finite params keep
    /// distinct fingerprints (JSON would write all of them as `null`).
    pub fn fingerprint(&self) -> String {
        let text = toml::to_string(self).expect("SlippageConfig must serialize");
        blake3::hash(text.as_bytes()).to_hex().to_string()
    }
}

/// A set of slippage model configs, as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlippageFile {
    #[serde(default)]
    pub models: Vec<SlippageConfig>,
}

impl SlippageFile {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file = Self::from_toml_str(&text)?;
        log::debug!(
            "loaded {} slippage model configs from {}",
            file.models.len(),
            path.display()
        );
        Ok(file)
    }
}

/// Load the slippage model configs stored at `path`.
pub fn load_config(path: impl AsRef<Path>) -> Result<SlippageFile, ConfigError> {
    SlippageFile::load(path.as_ref())
}
