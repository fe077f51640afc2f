use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ControlError;

/// Burner setting, guaranteed to be within 0..=100.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "i64", into = "u8")]
pub struct HeatIntensity(u8);

impl HeatIntensity {
    pub const MAX: u8 = 100;

    pub fn new(value: i64) -> Result<Self, ControlError> {
        if (0..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ControlError::HeatIntensityOutOfRange(value))
        }
    }

    /// Clamps into range instead of failing, for slider-style input.
    pub fn saturating(value: i64) -> Self {
        let clamped = value.clamp(0, i64::from(Self::MAX));
        if clamped != value {
            tracing::warn!(requested = value, applied = clamped, "heat intensity clamped");
        }
        Self(clamped as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for HeatIntensity {
    fn default() -> Self {
        Self(50)
    }
}

impl TryFrom<i64> for HeatIntensity {
    type Error = ControlError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HeatIntensity> for u8 {
    fn from(value: HeatIntensity) -> Self {
        value.0
    }
}

impl fmt::Display for HeatIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionWindow {
    Ethanol,
    Water,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    #[serde(rename = "heating in progress")]
    Heating,
    #[serde(rename = "distilling ethanol")]
    DistillingEthanol,
    #[serde(rename = "distilling water")]
    DistillingWater,
}

impl Observation {
    pub fn label(self) -> &'static str {
        match self {
            Observation::Heating => "heating in progress",
            Observation::DistillingEthanol => "distilling ethanol",
            Observation::DistillingWater => "distilling water",
        }
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One recorded reading. `tick` is 1-based elapsed seconds.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SimulationSample {
    pub tick: u32,
    pub temperature: f64,
    pub drop_rate: u8,
    pub volume_ml: f64,
    pub observation: Observation,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Finished,
    Cancelled,
}
