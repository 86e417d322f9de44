//! Configuration for mise
//!
//! Recommendation defaults, complexity engineering and dataset column
//! mapping, loadable from TOML or JSON.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::complexity::ComplexityConfig;
use crate::index::DistanceMetric;
use crate::normalize::ScaleMethod;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Number of recommendations per query
    pub k: usize,
    /// Feature scaling method
    pub scale: ScaleMethod,
    /// Distance between query and recipe
    pub metric: DistanceMetric,
    /// Complexity score engineering
    pub complexity: ComplexityConfig,
    /// Dataset column mapping
    pub data: DataConfig,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            k: 5,
            scale: ScaleMethod::default(),
            metric: DistanceMetric::default(),
            complexity: ComplexityConfig::default(),
            data: DataConfig::default(),
        }
    }
}

/// Which dataset columns feed the recipe table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Recipe identifier column
    pub id_column: String,
    /// Display name column (optional in the data)
    pub name_column: String,
    /// Ingredient list column, used only for encoding
    pub ingredients_column: String,
    /// Extra numeric features appended after minutes and complexity
    pub extra_features: Vec<String>,
    /// Drop rows with missing or out-of-range features instead of failing
    pub drop_invalid: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            id_column: "id".to_string(),
            name_column: "name".to_string(),
            ingredients_column: "ingredients".to_string(),
            extra_features: Vec::new(),
            drop_invalid: false,
        }
    }
}

impl RecommenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location: `<config dir>/mise/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mise").join("config.toml"))
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.k == 0 {
            return Err(ConfigError::OutOfRange("k must be positive".to_string()));
        }

        let weights = [
            ("ingredient_weight", self.complexity.ingredient_weight),
            ("step_weight", self.complexity.step_weight),
        ];
        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::OutOfRange(format!(
                    "{} must be a non-negative number",
                    name
                )));
            }
        }

        let range = self.complexity.range;
        if !range.min.is_finite() || !range.max.is_finite() || range.min >= range.max {
            return Err(ConfigError::InvalidRange(format!(
                "complexity range {} must be finite with min < max",
                range
            )));
        }
        if range.min < 0.0 {
            return Err(ConfigError::InvalidRange(
                "complexity range must not go below 0".to_string(),
            ));
        }

        if self.data.id_column.trim().is_empty() {
            return Err(ConfigError::MissingField("data.id_column".to_string()));
        }

        Ok(())
    }
}

/// Configuration loading or validation error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Value is out of valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),
    /// Complexity range is malformed
    #[error("Invalid range: {0}")]
    InvalidRange(String),
    /// Required field is missing
    #[error("Missing field: {0}")]
    MissingField(String),
    #[error("Cannot read config: {0}")]
    Io(String),
    #[error("Cannot parse config: {0}")]
    Parse(String),
}
