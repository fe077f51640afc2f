use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Largest accepted `tick_budget`; one sample is kept per tick.
pub const MAX_TICK_BUDGET: u32 = 100_000;

/// Inclusive temperature band, in °C.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct TemperatureWindow {
    pub min: f64,
    pub max: f64,
}

impl TemperatureWindow {
    pub fn contains(&self, temperature: f64) -> bool {
        temperature >= self.min && temperature <= self.max
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LabConfig {
    pub tick_period_ms: u64,
    pub tick_budget: u32,
    pub ethanol_window: TemperatureWindow,
    pub water_window_min: f64,
    pub cooling_damping_factor: f64,
    pub volume_per_drop_ml: f64,
    pub ambient_temperature: f64,
    pub history_display_len: usize,
    pub receiver_capacity_ml: f64,
    pub content_file: Option<PathBuf>,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 100,
            tick_budget: 80,
            ethanol_window: TemperatureWindow { min: 78.0, max: 82.0 },
            water_window_min: 90.0,
            cooling_damping_factor: 0.7,
            volume_per_drop_ml: 0.1,
            ambient_temperature: 25.0,
            history_display_len: 10,
            receiver_capacity_ml: 100.0,
            content_file: None,
        }
    }
}

impl LabConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_period_ms == 0 {
            return Err(ConfigError::Invalid("tick_period_ms must be positive".to_string()));
        }
        if self.tick_budget == 0 {
            return Err(ConfigError::Invalid("tick_budget must be positive".to_string()));
        }
        if self.tick_budget > MAX_TICK_BUDGET {
            return Err(ConfigError::Invalid(format!(
                "tick_budget ({}) must not exceed {}",
                self.tick_budget, MAX_TICK_BUDGET
            )));
        }
        if !(self.ethanol_window.min < self.ethanol_window.max) {
            return Err(ConfigError::Invalid(format!(
                "ethanol_window.min ({}) must be below ethanol_window.max ({})",
                self.ethanol_window.min, self.ethanol_window.max
            )));
        }
        if !(self.water_window_min >= self.ethanol_window.max) {
            return Err(ConfigError::Invalid(format!(
                "water_window_min ({}) must not overlap the ethanol window (max {})",
                self.water_window_min, self.ethanol_window.max
            )));
        }
        if !(self.cooling_damping_factor > 0.0 && self.cooling_damping_factor <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "cooling_damping_factor ({}) must be in (0, 1]",
                self.cooling_damping_factor
            )));
        }
        if !(self.volume_per_drop_ml >= 0.0) {
            return Err(ConfigError::Invalid("volume_per_drop_ml must not be negative".to_string()));
        }
        if !(self.receiver_capacity_ml > 0.0) {
            return Err(ConfigError::Invalid("receiver_capacity_ml must be positive".to_string()));
        }
        Ok(())
    }

    pub fn tick_period(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_period_ms)
    }
}

pub fn parse_config(contents: &str, origin: &Path) -> Result<LabConfig, ConfigError> {
    let config: LabConfig = toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: origin.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

pub fn load_config_from_file(file_path: &Path) -> Result<LabConfig, ConfigError> {
    let contents = fs::read_to_string(file_path).map_err(|source| ConfigError::Io {
        path: file_path.to_path_buf(),
        source,
    })?;
    parse_config(&contents, file_path)
}
