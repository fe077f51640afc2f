//*** START FILE: src/headless.rs ***//
use serde::Serialize;
use std::fmt::Write as _;
use tracing::info;

use crate::config::LabConfig;
use crate::simulation::{analyze, AnalysisSummary, HeatIntensity, Hypothesis, SimulationSample, Simulator, Verdict};

// Parameters for one windowless run, filled from `clap` in main.rs.
#[derive(Debug, Clone)]
pub struct HeadlessArgs {
    pub heat: HeatIntensity,
    pub cooling: bool,
    pub hypothesis: Option<Hypothesis>,
}

#[derive(Serialize, Debug, Clone)]
pub struct HeadlessReport {
    pub heat_intensity: HeatIntensity,
    pub cooling_enabled: bool,
    pub tick_budget: u32,
    pub samples: Vec<SimulationSample>,
    pub analysis: AnalysisSummary,
}

/// Runs a full experiment by calling `tick` directly, without the real-time driver.
pub fn run_headless(config: &LabConfig, args: &HeadlessArgs) -> HeadlessReport {
    let mut simulator = Simulator::new(config.clone());
    simulator.set_heat_intensity(args.heat);
    simulator.set_cooling(args.cooling);
    simulator.start();
    while simulator.tick().is_some() {}

    let analysis = analyze(simulator.history(), config, args.hypothesis);
    info!(
        samples = simulator.history().len(),
        volume_ml = simulator.volume_ml(),
        "headless run complete"
    );
    HeadlessReport {
        heat_intensity: args.heat,
        cooling_enabled: args.cooling,
        tick_budget: config.tick_budget,
        samples: simulator.history().to_vec(),
        analysis,
    }
}

pub fn format_report(report: &HeadlessReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Heat {} | Cooling {} | {} ticks",
        report.heat_intensity,
        if report.cooling_enabled { "on" } else { "off" },
        report.tick_budget
    );
    let _ = writeln!(out, "{:>5}  {:>8}  {:>10}  {:>8}  {}", "time", "temp °C", "drops/s", "vol mL", "observation");
    for sample in &report.samples {
        let _ = writeln!(
            out,
            "{:>5}  {:>8.1}  {:>10}  {:>8.1}  {}",
            sample.tick, sample.temperature, sample.drop_rate, sample.volume_ml, sample.observation
        );
    }
    let summary = &report.analysis;
    let _ = writeln!(out);
    let _ = writeln!(out, "Ethanol phase: {:.1} mL over {} ticks", summary.ethanol_volume_ml, summary.ethanol_ticks);
    let _ = writeln!(out, "Water phase:   {:.1} mL over {} ticks", summary.water_volume_ml, summary.water_ticks);
    let _ = writeln!(out, "Total:         {:.1} mL", summary.total_volume_ml);
    match summary.hypothesis {
        Some(hypothesis) => {
            let verdict = match summary.verdict {
                Verdict::Correct => "correct",
                Verdict::Incorrect => "incorrect",
            };
            let _ = writeln!(out, "Hypothesis '{}' is {}.", hypothesis, verdict);
        }
        None => {
            let _ = writeln!(out, "No hypothesis given.");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_to_the_budget() {
        let config = LabConfig::default();
        let args = HeadlessArgs {
            heat: HeatIntensity::saturating(100),
            cooling: false,
            hypothesis: Some(Hypothesis::EthanolFirst),
        };
        let report = run_headless(&config, &args);
        assert_eq!(report.samples.len(), 80);
        assert_eq!(report.analysis.verdict, Verdict::Correct);
        assert!(report.analysis.ethanol_volume_ml > 0.0);

        let text = format_report(&report);
        assert!(text.contains("Cooling off"));
        assert!(text.contains("is correct"));
        assert_eq!(text.lines().filter(|line| line.contains("distilling ethanol")).count(), report.analysis.ethanol_ticks);
    }

    #[test]
    fn report_serializes_to_json() {
        let config = LabConfig { tick_budget: 3, ..LabConfig::default() };
        let args = HeadlessArgs { heat: HeatIntensity::default(), cooling: true, hypothesis: None };
        let report = run_headless(&config, &args);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["heat_intensity"], 50);
        assert_eq!(json["samples"].as_array().map(Vec::len), Some(3));
        assert_eq!(json["analysis"]["verdict"], "incorrect");
    }
}
//*** END FILE: src/headless.rs ***//
