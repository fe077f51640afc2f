//*** START FILE: src/simulation/core_algo.rs ***//
use super::numerical_types::{CollectionWindow, HeatIntensity, Observation};
use crate::config::LabConfig;

/// Ticks before this use the intensity-driven rise.
pub const EARLY_REGIME_END: u32 = 30;
/// Ticks before this (and from EARLY_REGIME_END) use the fixed middle rise.
pub const MIDDLE_REGIME_END: u32 = 60;

pub const EARLY_CEILING_C: f64 = 78.0;
pub const MIDDLE_CEILING_C: f64 = 93.0;
pub const MIDDLE_RISE_PER_TICK: f64 = 0.3;
pub const LATE_RISE_PER_TICK: f64 = 0.1;
/// Intensity 100 gives 4 °C per tick before damping.
pub const INTENSITY_PER_DEGREE: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInputs {
    /// Elapsed ticks including the one being computed.
    pub elapsed: u32,
    pub temperature: f64,
    pub heat: HeatIntensity,
    pub cooling: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    pub temperature: f64,
    pub window: Option<CollectionWindow>,
    pub drop_rate: u8,
    pub volume_added_ml: f64,
    pub observation: Observation,
}

pub fn damping(config: &LabConfig, cooling: bool) -> f64 {
    if cooling {
        config.cooling_damping_factor
    } else {
        1.0
    }
}

// A ceiling caps the rise but never pulls an already hotter flask down.
fn rise_toward(temperature: f64, rise: f64, ceiling: Option<f64>) -> f64 {
    match ceiling {
        Some(cap) if temperature >= cap => temperature,
        Some(cap) => (temperature + rise).min(cap),
        None => temperature + rise,
    }
}

pub fn next_temperature(config: &LabConfig, inputs: &TickInputs) -> f64 {
    let damping = damping(config, inputs.cooling);
    if inputs.elapsed < EARLY_REGIME_END {
        let rise = f64::from(inputs.heat.value()) / INTENSITY_PER_DEGREE * damping;
        rise_toward(inputs.temperature, rise, Some(EARLY_CEILING_C))
    } else if inputs.elapsed < MIDDLE_REGIME_END {
        rise_toward(inputs.temperature, MIDDLE_RISE_PER_TICK * damping, Some(MIDDLE_CEILING_C))
    } else {
        rise_toward(inputs.temperature, LATE_RISE_PER_TICK * damping, None)
    }
}

pub fn classify_window(config: &LabConfig, temperature: f64) -> Option<CollectionWindow> {
    if config.ethanol_window.contains(temperature) {
        Some(CollectionWindow::Ethanol)
    } else if temperature > config.water_window_min {
        Some(CollectionWindow::Water)
    } else {
        None
    }
}

/// Drops per second. A running condenser always collects at least as fast.
pub fn drop_rate(window: Option<CollectionWindow>, cooling: bool) -> u8 {
    match (window, cooling) {
        (Some(CollectionWindow::Ethanol), true) => 3,
        (Some(CollectionWindow::Ethanol), false) => 2,
        (Some(CollectionWindow::Water), true) => 2,
        (Some(CollectionWindow::Water), false) => 1,
        (None, _) => 0,
    }
}

pub fn observation_for(window: Option<CollectionWindow>) -> Observation {
    match window {
        Some(CollectionWindow::Ethanol) => Observation::DistillingEthanol,
        Some(CollectionWindow::Water) => Observation::DistillingWater,
        None => Observation::Heating,
    }
}

/// Computes one tick. Window, drop rate and label all use the post-tick temperature.
pub fn compute_tick(config: &LabConfig, inputs: &TickInputs) -> TickOutcome {
    let temperature = next_temperature(config, inputs);
    let window = classify_window(config, temperature);
    let drop_rate = drop_rate(window, inputs.cooling);
    TickOutcome {
        temperature,
        window,
        drop_rate,
        volume_added_ml: f64::from(drop_rate) * config.volume_per_drop_ml,
        observation: observation_for(window),
    }
}

//*** END FILE: src/simulation/core_algo.rs ***//
