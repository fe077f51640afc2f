use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::LabConfig;
use crate::lesson::{CompletionState, LessonContent, PhaseNavigator, Stage, StageContent};
use crate::simulation::{analyze, AnalysisSummary, HeatIntensity, Hypothesis, RunState, SimulationSample, Simulator};

/// Composes the navigator and the simulator behind the operations the UI is allowed to use.
#[derive(Debug, Clone)]
pub struct WizardShell {
    navigator: PhaseNavigator,
    simulator: Simulator,
    lesson: LessonContent,
    hypothesis: Option<Hypothesis>,
}

impl WizardShell {
    pub fn new(config: LabConfig, lesson: LessonContent) -> Self {
        Self {
            navigator: PhaseNavigator::new(),
            simulator: Simulator::new(config),
            lesson,
            hypothesis: None,
        }
    }

    // --- Navigation ---

    pub fn current_stage(&self) -> Stage {
        self.navigator.current()
    }

    pub fn navigator(&self) -> &PhaseNavigator {
        &self.navigator
    }

    pub fn next(&mut self) {
        let from = self.navigator.current();
        if self.navigator.advance() {
            self.on_stage_change(from);
        }
    }

    pub fn previous(&mut self) {
        let from = self.navigator.current();
        if self.navigator.retreat() {
            self.on_stage_change(from);
        }
    }

    pub fn select_stage(&mut self, stage: Stage) {
        let from = self.navigator.current();
        self.navigator.jump_to(stage);
        if from != stage {
            self.on_stage_change(from);
        }
    }

    pub fn progress_label(&self) -> (usize, usize) {
        self.navigator.progress_label()
    }

    pub fn completion_state(&self, stage: Stage) -> CompletionState {
        self.navigator.completion_state(stage)
    }

    // A run must not keep ticking once its stage is no longer on screen.
    fn on_stage_change(&mut self, from: Stage) {
        let to = self.navigator.current();
        debug!(from = from.id(), to = to.id(), "stage changed");
        if from == Stage::Experiment && to != Stage::Experiment && self.simulator.stop() {
            info!("left the experiment stage, active run cancelled");
        }
    }

    // --- Content ---

    pub fn stage_title(&self, stage: Stage) -> &str {
        self.lesson.title(stage)
    }

    pub fn stage_content(&self, stage: Stage) -> Option<&StageContent> {
        self.lesson.stage(stage)
    }

    // --- Hypothesis ---

    pub fn hypothesis(&self) -> Option<Hypothesis> {
        self.hypothesis
    }

    /// Locked once a run has completed, until the next run starts.
    pub fn hypothesis_locked(&self) -> bool {
        self.simulator.state() == RunState::Finished
    }

    /// Returns false when the selection is locked.
    pub fn set_hypothesis(&mut self, hypothesis: Hypothesis) -> bool {
        if self.hypothesis_locked() {
            debug!(hypothesis = hypothesis.id(), "hypothesis change ignored, run already finished");
            return false;
        }
        if self.hypothesis != Some(hypothesis) {
            info!(hypothesis = hypothesis.id(), "hypothesis selected");
            self.hypothesis = Some(hypothesis);
        }
        true
    }

    // --- Experiment controls (experiment stage only) ---

    pub fn controls_available(&self) -> bool {
        self.navigator.current() == Stage::Experiment
    }

    pub fn start_experiment(&mut self) -> bool {
        self.start_experiment_at(Instant::now())
    }

    pub fn start_experiment_at(&mut self, now: Instant) -> bool {
        if !self.controls_available() {
            debug!(stage = self.current_stage().id(), "start ignored outside the experiment stage");
            return false;
        }
        self.simulator.start_at(now)
    }

    pub fn stop_experiment(&mut self) -> bool {
        self.controls_available() && self.simulator.stop()
    }

    pub fn set_heat_intensity(&mut self, heat: HeatIntensity) -> bool {
        if !self.controls_available() {
            return false;
        }
        self.simulator.set_heat_intensity(heat);
        true
    }

    pub fn set_cooling(&mut self, enabled: bool) -> bool {
        if !self.controls_available() {
            return false;
        }
        self.simulator.set_cooling(enabled);
        true
    }

    pub fn toggle_cooling(&mut self) -> bool {
        let enabled = !self.simulator.cooling_enabled();
        self.set_cooling(enabled)
    }

    /// Drives the tick clock; returns the delay until the next tick when a run is active.
    pub fn pump(&mut self, now: Instant) -> Option<Duration> {
        self.simulator.pump(now);
        self.simulator.time_until_next_tick(now)
    }

    // --- Read-only views ---

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    pub fn config(&self) -> &LabConfig {
        self.simulator.config()
    }

    pub fn observation_rows(&self) -> &[SimulationSample] {
        self.simulator.recent(self.config().history_display_len)
    }

    pub fn analysis(&self) -> AnalysisSummary {
        analyze(self.simulator.history(), self.simulator.config(), self.hypothesis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Verdict;

    fn shell() -> WizardShell {
        WizardShell::new(LabConfig { tick_budget: 20, ..LabConfig::default() }, LessonContent::default())
    }

    #[test]
    fn controls_only_work_on_experiment_stage() {
        let mut shell = shell();
        assert!(!shell.controls_available());
        assert!(!shell.start_experiment());
        assert!(!shell.set_heat_intensity(HeatIntensity::saturating(90)));
        assert!(!shell.toggle_cooling());
        assert_eq!(shell.simulator().heat_intensity(), HeatIntensity::default());

        shell.select_stage(Stage::Experiment);
        assert!(shell.set_heat_intensity(HeatIntensity::saturating(90)));
        assert!(shell.toggle_cooling());
        assert!(!shell.simulator().cooling_enabled());
        assert!(shell.start_experiment());
        assert!(shell.simulator().is_running());
    }

    #[test]
    fn leaving_experiment_cancels_run() {
        let mut shell = shell();
        shell.select_stage(Stage::Experiment);
        let t0 = Instant::now();
        shell.start_experiment_at(t0);
        shell.pump(t0 + Duration::from_millis(300));
        assert_eq!(shell.simulator().history().len(), 3);

        shell.next();
        assert_eq!(shell.current_stage(), Stage::Observation);
        assert_eq!(shell.simulator().state(), RunState::Cancelled);
        assert!(!shell.simulator().has_timer());
        assert_eq!(shell.pump(t0 + Duration::from_secs(10)), None);
        assert_eq!(shell.observation_rows().len(), 3);
    }

    #[test]
    fn reselecting_experiment_keeps_run_alive() {
        let mut shell = shell();
        shell.select_stage(Stage::Experiment);
        shell.start_experiment();
        shell.select_stage(Stage::Experiment);
        assert!(shell.simulator().is_running());
    }

    #[test]
    fn hypothesis_locks_after_finished_run() {
        let mut shell = shell();
        assert!(shell.set_hypothesis(Hypothesis::WaterFirst));
        shell.select_stage(Stage::Experiment);
        let t0 = Instant::now();
        shell.start_experiment_at(t0);
        assert!(shell.set_hypothesis(Hypothesis::EthanolFirst));
        shell.pump(t0 + Duration::from_secs(60));
        assert_eq!(shell.simulator().state(), RunState::Finished);

        assert!(shell.hypothesis_locked());
        assert!(!shell.set_hypothesis(Hypothesis::Mixed));
        assert_eq!(shell.hypothesis(), Some(Hypothesis::EthanolFirst));
        assert_eq!(shell.analysis().verdict, Verdict::Correct);

        shell.start_experiment();
        assert!(!shell.hypothesis_locked());
    }

    #[test]
    fn observation_rows_are_windowed() {
        let mut shell = shell();
        shell.select_stage(Stage::Experiment);
        let t0 = Instant::now();
        shell.start_experiment_at(t0);
        shell.pump(t0 + Duration::from_secs(60));
        let rows = shell.observation_rows();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows.last().map(|s| s.tick), Some(20));
    }

    #[test]
    fn navigation_boundaries() {
        let mut shell = shell();
        shell.previous();
        assert_eq!(shell.progress_label(), (1, 11));
        for _ in 0..30 {
            shell.next();
        }
        assert_eq!(shell.current_stage(), Stage::Evaluation);
        assert_eq!(shell.completion_state(Stage::Analysis), CompletionState::Completed);
    }
}
