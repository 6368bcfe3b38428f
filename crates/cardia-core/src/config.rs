use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Monitor configuration. The defaults are the constants the estimator was
/// tuned with; every one of them is an explicit parameter here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Nominal interval between incoming samples (seconds).
    pub sample_interval_sec: f32,
    /// Length of the tracked sample history window (seconds).
    pub buffer_seconds: f32,
    /// Minimum buffered samples before peak classification starts.
    pub min_samples: usize,
    /// Threshold = mean + threshold_sigma * std_dev over the window.
    pub threshold_sigma: f32,
    /// Minimum time between accepted peaks (seconds).
    pub refractory_sec: f32,
    /// Trailing window for BPM computation (seconds).
    pub rate_window_sec: f32,
    /// Alert fires when the integer BPM estimate strictly exceeds this.
    pub alert_bpm: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sample_interval_sec: 0.01,
            buffer_seconds: 10.0,
            min_samples: 5,
            threshold_sigma: 1.2,
            refractory_sec: 0.3,
            rate_window_sec: 60.0,
            alert_bpm: 110,
        }
    }
}

impl MonitorConfig {
    /// Sample-window capacity derived from the buffer duration.
    pub fn capacity(&self) -> usize {
        (self.buffer_seconds as f64 / self.sample_interval_sec as f64).round() as usize
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: MonitorConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    /// Environment variables are prefixed with CARDIA_
    /// Example: CARDIA_ALERT_BPM=120
    pub fn from_file_with_env<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    pub(crate) fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        use std::env;

        if let Ok(val) = env::var("CARDIA_SAMPLE_INTERVAL_SEC") {
            self.sample_interval_sec = val.parse().map_err(|_| {
                ConfigError::Validation("Invalid CARDIA_SAMPLE_INTERVAL_SEC".to_string())
            })?;
        }
        if let Ok(val) = env::var("CARDIA_BUFFER_SECONDS") {
            self.buffer_seconds = val.parse().map_err(|_| {
                ConfigError::Validation("Invalid CARDIA_BUFFER_SECONDS".to_string())
            })?;
        }
        if let Ok(val) = env::var("CARDIA_MIN_SAMPLES") {
            self.min_samples = val
                .parse()
                .map_err(|_| ConfigError::Validation("Invalid CARDIA_MIN_SAMPLES".to_string()))?;
        }
        if let Ok(val) = env::var("CARDIA_THRESHOLD_SIGMA") {
            self.threshold_sigma = val.parse().map_err(|_| {
                ConfigError::Validation("Invalid CARDIA_THRESHOLD_SIGMA".to_string())
            })?;
        }
        if let Ok(val) = env::var("CARDIA_REFRACTORY_SEC") {
            self.refractory_sec = val.parse().map_err(|_| {
                ConfigError::Validation("Invalid CARDIA_REFRACTORY_SEC".to_string())
            })?;
        }
        if let Ok(val) = env::var("CARDIA_RATE_WINDOW_SEC") {
            self.rate_window_sec = val.parse().map_err(|_| {
                ConfigError::Validation("Invalid CARDIA_RATE_WINDOW_SEC".to_string())
            })?;
        }
        if let Ok(val) = env::var("CARDIA_ALERT_BPM") {
            self.alert_bpm = val
                .parse()
                .map_err(|_| ConfigError::Validation("Invalid CARDIA_ALERT_BPM".to_string()))?;
        }

        Ok(())
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_interval_sec <= 0.0 {
            return Err(ConfigError::Validation(
                "sample_interval_sec must be positive".to_string(),
            ));
        }
        if self.buffer_seconds <= 0.0 {
            return Err(ConfigError::Validation(
                "buffer_seconds must be positive".to_string(),
            ));
        }
        if self.min_samples < 2 {
            return Err(ConfigError::Validation(
                "min_samples must be >= 2".to_string(),
            ));
        }
        if self.capacity() < self.min_samples {
            return Err(ConfigError::Validation(
                "window capacity must be >= min_samples".to_string(),
            ));
        }
        if self.threshold_sigma <= 0.0 {
            return Err(ConfigError::Validation(
                "threshold_sigma must be positive".to_string(),
            ));
        }
        if self.refractory_sec < 0.0 {
            return Err(ConfigError::Validation(
                "refractory_sec must be non-negative".to_string(),
            ));
        }
        if self.rate_window_sec <= self.refractory_sec {
            return Err(ConfigError::Validation(
                "rate_window_sec must be > refractory_sec".to_string(),
            ));
        }
        if self.alert_bpm == 0 {
            return Err(ConfigError::Validation(
                "alert_bpm must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Export configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Save configuration to a file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = self
            .to_toml_string()
            .map_err(|e| ConfigError::Validation(format!("TOML serialization error: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }
}
