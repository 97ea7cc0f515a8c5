//! Runtime configuration
//!
//! Loaded from `<ROOT>/config/ranker.yml` when present, otherwise defaults.
//! `SCHOLARSHIP_DB` overrides the store path.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const CONFIG_RELATIVE_PATH: &str = "config/ranker.yml";
pub const DB_ENV_VAR: &str = "SCHOLARSHIP_DB";
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Weight of each criterion in the final score.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Weights {
    pub sentiment: f64,
    pub address: f64,
    pub gender: f64,
    pub cgpa: f64,
    pub qualification: f64,
    pub institution: f64,
}

pub const DEFAULT_WEIGHTS: Weights = Weights {
    sentiment: 1.0 / 6.0,
    address: 0.5 / 6.0,
    gender: 1.5 / 6.0,
    cgpa: 0.5 / 6.0,
    qualification: 1.5 / 6.0,
    institution: 1.0 / 6.0,
};

impl Default for Weights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.sentiment + self.address + self.gender + self.cgpa + self.qualification + self.institution
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("sentiment", self.sentiment),
            ("address", self.address),
            ("gender", self.gender),
            ("cgpa", self.cgpa),
            ("qualification", self.qualification),
            ("institution", self.institution),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum(sum));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Top of the CGPA scale used for normalization.
    pub max_cgpa: f64,
    pub weights: Weights,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_cgpa: 10.0,
            weights: DEFAULT_WEIGHTS,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_cgpa.is_finite() || self.max_cgpa <= 0.0 {
            return Err(ConfigError::MaxCgpa(self.max_cgpa));
        }
        self.weights.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    pub db_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("data/scholarships.db"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    /// Load configuration rooted at `root`, applying env overrides.
    pub fn load(root: &str) -> Result<Self> {
        let path = PathBuf::from(root).join(CONFIG_RELATIVE_PATH);
        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Self::default()
        };

        if config.store.db_path.is_relative() {
            config.store.db_path = PathBuf::from(root).join(&config.store.db_path);
        }
        if let Ok(db) = std::env::var(DB_ENV_VAR) {
            if !db.trim().is_empty() {
                config.store.db_path = PathBuf::from(db.trim());
            }
        }

        config.scoring.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: AppConfig = serde_yaml::from_str(content)
            .with_context(|| "Failed to parse config YAML")?;
        Ok(config)
    }
}
