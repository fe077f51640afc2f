use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::core_algo::{compute_tick, TickInputs};
use super::numerical_types::{HeatIntensity, RunState, SimulationSample};
use crate::config::LabConfig;

const HISTORY_PREALLOC: u32 = 1024;

/// Deadline clock turning real time into ticks. At most one per simulator.
#[derive(Debug, Clone, Copy)]
struct TickDriver {
    period: Duration,
    next_deadline: Instant,
}

/// Owns the whole experiment state. Every mutation goes through its methods.
#[derive(Debug, Clone)]
pub struct Simulator {
    config: LabConfig,
    temperature: f64,
    volume_ml: f64,
    elapsed: u32,
    history: Vec<SimulationSample>,
    state: RunState,
    heat: HeatIntensity,
    cooling: bool,
    driver: Option<TickDriver>,
}

impl Simulator {
    pub fn new(config: LabConfig) -> Self {
        Self {
            temperature: config.ambient_temperature,
            volume_ml: 0.0,
            elapsed: 0,
            history: Vec::with_capacity(config.tick_budget.min(HISTORY_PREALLOC) as usize),
            state: RunState::Idle,
            heat: HeatIntensity::default(),
            cooling: true,
            driver: None,
            config,
        }
    }

    pub fn start(&mut self) -> bool {
        self.start_at(Instant::now())
    }

    /// Returns false (and changes nothing) while a run is already active.
    pub fn start_at(&mut self, now: Instant) -> bool {
        if self.state == RunState::Running {
            debug!("start ignored, run already active");
            return false;
        }
        self.temperature = self.config.ambient_temperature;
        self.volume_ml = 0.0;
        self.elapsed = 0;
        self.history.clear();
        self.state = RunState::Running;
        let period = self.config.tick_period();
        self.driver = Some(TickDriver { period, next_deadline: now + period });
        info!(
            heat = self.heat.value(),
            cooling = self.cooling,
            budget = self.config.tick_budget,
            "distillation run started"
        );
        true
    }

    /// Cancels an active run and disarms the driver. History is kept.
    pub fn stop(&mut self) -> bool {
        if self.state != RunState::Running {
            return false;
        }
        self.state = RunState::Cancelled;
        self.driver = None;
        info!(elapsed = self.elapsed, volume_ml = self.volume_ml, "distillation run cancelled");
        true
    }

    /// Advances one tick. Outside a run this does nothing.
    pub fn tick(&mut self) -> Option<&SimulationSample> {
        if self.state != RunState::Running {
            return None;
        }
        self.elapsed += 1;
        let outcome = compute_tick(
            &self.config,
            &TickInputs {
                elapsed: self.elapsed,
                temperature: self.temperature,
                heat: self.heat,
                cooling: self.cooling,
            },
        );
        self.temperature = outcome.temperature;
        self.volume_ml += outcome.volume_added_ml;

        self.history.push(SimulationSample {
            tick: self.elapsed,
            temperature: self.temperature,
            drop_rate: outcome.drop_rate,
            volume_ml: self.volume_ml,
            observation: outcome.observation,
        });
        debug!(
            tick = self.elapsed,
            temperature = self.temperature,
            drop_rate = outcome.drop_rate,
            volume_ml = self.volume_ml,
            "tick"
        );

        if self.elapsed >= self.config.tick_budget {
            self.state = RunState::Finished;
            self.driver = None;
            info!(ticks = self.elapsed, volume_ml = self.volume_ml, "distillation run finished");
        }
        self.history.last()
    }

    /// Fires every tick whose deadline is at or before `now`. Returns how many fired.
    pub fn pump(&mut self, now: Instant) -> usize {
        let mut fired = 0;
        while let Some(driver) = self.driver.as_mut() {
            if driver.next_deadline > now {
                break;
            }
            driver.next_deadline += driver.period;
            self.tick();
            fired += 1;
        }
        fired
    }

    pub fn time_until_next_tick(&self, now: Instant) -> Option<Duration> {
        self.driver.map(|driver| driver.next_deadline.saturating_duration_since(now))
    }

    pub fn set_heat_intensity(&mut self, heat: HeatIntensity) {
        if heat != self.heat {
            debug!(from = self.heat.value(), to = heat.value(), "heat intensity changed");
            self.heat = heat;
        }
    }

    pub fn set_cooling(&mut self, enabled: bool) {
        if enabled != self.cooling {
            debug!(enabled, "cooling toggled");
            self.cooling = enabled;
        }
    }

    pub fn config(&self) -> &LabConfig {
        &self.config
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn volume_ml(&self) -> f64 {
        self.volume_ml
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn has_timer(&self) -> bool {
        self.driver.is_some()
    }

    pub fn heat_intensity(&self) -> HeatIntensity {
        self.heat
    }

    pub fn cooling_enabled(&self) -> bool {
        self.cooling
    }

    pub fn history(&self) -> &[SimulationSample] {
        &self.history
    }

    /// The last `count` samples, oldest first.
    pub fn recent(&self, count: usize) -> &[SimulationSample] {
        let skip = self.history.len().saturating_sub(count);
        &self.history[skip..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::numerical_types::Observation;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn starts_idle_and_ticks_are_ignored() {
        let mut sim = Simulator::new(LabConfig::default());
        assert_eq!(sim.state(), RunState::Idle);
        assert!(sim.tick().is_none());
        assert!(sim.history().is_empty());
        assert!(!sim.has_timer());
    }

    #[test]
    fn heat_fifty_with_cooling_scenario() {
        let mut sim = Simulator::new(LabConfig::default());
        sim.set_heat_intensity(HeatIntensity::saturating(50));
        sim.set_cooling(true);
        sim.start();

        let first = sim.tick().cloned().unwrap();
        assert_eq!(first.tick, 1);
        assert!(approx(first.temperature, (25.0 + 50.0 / 25.0 * 0.7_f64).min(78.0)));

        while sim.elapsed() < 30 {
            sim.tick();
        }
        let before = sim.temperature();
        let sample = sim.tick().cloned().unwrap();
        assert_eq!(sample.tick, 31);
        assert!(approx(sample.temperature, (before + 0.3 * 0.7).min(93.0)));
    }

    #[test]
    fn pinned_in_ethanol_window_collects_three_drops_per_tick() {
        let config = LabConfig { ambient_temperature: 80.0, ..LabConfig::default() };
        let mut sim = Simulator::new(config);
        sim.set_heat_intensity(HeatIntensity::saturating(0));
        sim.set_cooling(true);
        sim.start();
        for _ in 0..10 {
            let sample = sim.tick().cloned().unwrap();
            assert!(approx(sample.temperature, 80.0));
            assert_eq!(sample.drop_rate, 3);
            assert_eq!(sample.observation, Observation::DistillingEthanol);
        }
        assert!(approx(sim.volume_ml(), 10.0 * 3.0 * 0.1));
    }

    #[test]
    fn above_water_threshold_collects_water() {
        let config = LabConfig { ambient_temperature: 91.0, ..LabConfig::default() };
        let mut sim = Simulator::new(config);
        sim.set_heat_intensity(HeatIntensity::saturating(100));
        sim.set_cooling(true);
        sim.start();
        let mut previous_volume = 0.0;
        for tick in 1..=20 {
            if tick == 11 {
                sim.set_cooling(false);
            }
            let sample = sim.tick().cloned().unwrap();
            let expected_rate = if tick <= 10 { 2 } else { 1 };
            assert!(sample.temperature > 90.0);
            assert_eq!(sample.drop_rate, expected_rate);
            assert_eq!(sample.observation, Observation::DistillingWater);
            assert!(approx(sample.volume_ml - previous_volume, f64::from(expected_rate) * 0.1));
            previous_volume = sample.volume_ml;
        }
        assert!(approx(sim.volume_ml(), 10.0 * 0.2 + 10.0 * 0.1));
    }

    #[test]
    fn huge_budget_does_not_preallocate_it() {
        let config = LabConfig { tick_budget: u32::MAX, ..LabConfig::default() };
        let mut sim = Simulator::new(config);
        assert!(sim.history.capacity() <= HISTORY_PREALLOC as usize);
        sim.start();
        assert_eq!(sim.tick().map(|s| s.tick), Some(1));
    }

    #[test]
    fn finishes_exactly_at_budget() {
        let config = LabConfig { tick_budget: 5, ..LabConfig::default() };
        let mut sim = Simulator::new(config);
        sim.start();
        for expected in 1..=5 {
            assert!(sim.is_running());
            assert_eq!(sim.tick().map(|s| s.tick), Some(expected));
        }
        assert_eq!(sim.state(), RunState::Finished);
        assert!(!sim.has_timer());
        assert!(sim.tick().is_none());
        assert_eq!(sim.history().len(), 5);
    }

    #[test]
    fn start_while_running_is_ignored() {
        let mut sim = Simulator::new(LabConfig::default());
        assert!(sim.start());
        sim.tick();
        sim.tick();
        assert!(!sim.start());
        assert_eq!(sim.elapsed(), 2);
        assert_eq!(sim.history().len(), 2);
    }

    #[test]
    fn restart_resets_everything() {
        let config = LabConfig { tick_budget: 40, ..LabConfig::default() };
        let mut sim = Simulator::new(config);
        sim.set_heat_intensity(HeatIntensity::saturating(100));
        sim.start();
        while sim.tick().is_some() {}
        assert!(sim.volume_ml() > 0.0);

        assert!(sim.start());
        assert_eq!(sim.elapsed(), 0);
        assert_eq!(sim.volume_ml(), 0.0);
        assert!(sim.history().is_empty());
        assert_eq!(sim.temperature(), 25.0);
    }

    #[test]
    fn stop_cancels_and_keeps_history() {
        let mut sim = Simulator::new(LabConfig::default());
        sim.start();
        sim.tick();
        assert!(sim.stop());
        assert_eq!(sim.state(), RunState::Cancelled);
        assert!(!sim.has_timer());
        assert!(sim.tick().is_none());
        assert_eq!(sim.history().len(), 1);
        assert!(!sim.stop());
    }

    #[test]
    fn control_changes_apply_from_next_tick_only() {
        let mut sim = Simulator::new(LabConfig::default());
        sim.set_cooling(false);
        sim.set_heat_intensity(HeatIntensity::saturating(100));
        sim.start();
        sim.tick();
        let recorded = sim.history().to_vec();

        sim.set_heat_intensity(HeatIntensity::saturating(0));
        assert_eq!(sim.history(), recorded.as_slice());
        let before = sim.temperature();
        sim.tick();
        assert!(approx(sim.temperature(), before));
    }

    #[test]
    fn pump_fires_due_ticks_only() {
        let config = LabConfig { tick_period_ms: 100, tick_budget: 10, ..LabConfig::default() };
        let mut sim = Simulator::new(config);
        let t0 = Instant::now();
        sim.start_at(t0);

        assert_eq!(sim.pump(t0 + Duration::from_millis(50)), 0);
        assert_eq!(sim.pump(t0 + Duration::from_millis(100)), 1);
        assert_eq!(sim.pump(t0 + Duration::from_millis(350)), 2);
        assert_eq!(
            sim.time_until_next_tick(t0 + Duration::from_millis(350)),
            Some(Duration::from_millis(50))
        );
        // Catch-up stops at the budget.
        assert_eq!(sim.pump(t0 + Duration::from_secs(60)), 7);
        assert_eq!(sim.state(), RunState::Finished);
        assert_eq!(sim.time_until_next_tick(t0 + Duration::from_secs(60)), None);
    }

    #[test]
    fn recent_returns_tail() {
        let mut sim = Simulator::new(LabConfig::default());
        sim.start();
        for _ in 0..15 {
            sim.tick();
        }
        let tail = sim.recent(10);
        assert_eq!(tail.len(), 10);
        assert_eq!(tail[0].tick, 6);
        assert_eq!(tail[9].tick, 15);
        assert_eq!(sim.recent(100).len(), 15);
    }
}
