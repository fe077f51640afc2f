use serde::{Deserialize, Serialize};
use std::fmt;

use super::core_algo::classify_window;
use super::numerical_types::{CollectionWindow, SimulationSample};
use crate::config::LabConfig;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Hypothesis {
    EthanolFirst,
    WaterFirst,
    Mixed,
}

impl Hypothesis {
    pub const ALL: [Hypothesis; 3] = [Hypothesis::EthanolFirst, Hypothesis::WaterFirst, Hypothesis::Mixed];

    pub fn id(self) -> &'static str {
        match self {
            Hypothesis::EthanolFirst => "ethanol-first",
            Hypothesis::WaterFirst => "water-first",
            Hypothesis::Mixed => "mixed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Hypothesis::EthanolFirst => "Ethanol distills first (lower boiling point)",
            Hypothesis::WaterFirst => "Water distills first (higher boiling point)",
            Hypothesis::Mixed => "Both distill together",
        }
    }

    pub fn from_id(id: &str) -> Option<Hypothesis> {
        Hypothesis::ALL.iter().copied().find(|h| h.id().eq_ignore_ascii_case(id.trim()))
    }
}

impl fmt::Display for Hypothesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Incorrect,
}

/// Ethanol boils first in this model, so only that prediction is correct.
pub fn verdict(hypothesis: Option<Hypothesis>) -> Verdict {
    match hypothesis {
        Some(Hypothesis::EthanolFirst) => Verdict::Correct,
        _ => Verdict::Incorrect,
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnalysisSummary {
    pub ethanol_volume_ml: f64,
    pub water_volume_ml: f64,
    pub ethanol_ticks: usize,
    pub water_ticks: usize,
    pub total_volume_ml: f64,
    pub hypothesis: Option<Hypothesis>,
    pub verdict: Verdict,
}

/// Pure reduction over a run's history. Each sample is credited with the volume it added
/// (its cumulative volume minus the previous sample's).
pub fn analyze(history: &[SimulationSample], config: &LabConfig, hypothesis: Option<Hypothesis>) -> AnalysisSummary {
    let mut ethanol_volume_ml = 0.0;
    let mut water_volume_ml = 0.0;
    let mut ethanol_ticks = 0;
    let mut water_ticks = 0;
    let mut previous_volume = 0.0;

    for sample in history {
        let added = (sample.volume_ml - previous_volume).max(0.0);
        previous_volume = sample.volume_ml;
        match classify_window(config, sample.temperature) {
            Some(CollectionWindow::Ethanol) => {
                ethanol_volume_ml += added;
                ethanol_ticks += 1;
            }
            Some(CollectionWindow::Water) => {
                water_volume_ml += added;
                water_ticks += 1;
            }
            None => {}
        }
    }

    AnalysisSummary {
        ethanol_volume_ml,
        water_volume_ml,
        ethanol_ticks,
        water_ticks,
        total_volume_ml: previous_volume,
        hypothesis,
        verdict: verdict(hypothesis),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::numerical_types::Observation;

    fn sample(tick: u32, temperature: f64, drop_rate: u8, volume_ml: f64) -> SimulationSample {
        SimulationSample { tick, temperature, drop_rate, volume_ml, observation: Observation::Heating }
    }

    #[test]
    fn only_ethanol_first_is_correct() {
        assert_eq!(verdict(Some(Hypothesis::EthanolFirst)), Verdict::Correct);
        assert_eq!(verdict(Some(Hypothesis::WaterFirst)), Verdict::Incorrect);
        assert_eq!(verdict(Some(Hypothesis::Mixed)), Verdict::Incorrect);
        assert_eq!(verdict(None), Verdict::Incorrect);
    }

    #[test]
    fn splits_volume_by_window() {
        let config = LabConfig::default();
        let history = vec![
            sample(1, 70.0, 0, 0.0),
            sample(2, 78.0, 3, 0.3),
            sample(3, 81.0, 3, 0.6),
            sample(4, 85.0, 0, 0.6),
            sample(5, 91.0, 2, 0.8),
        ];
        let summary = analyze(&history, &config, Some(Hypothesis::Mixed));
        assert!((summary.ethanol_volume_ml - 0.6).abs() < 1e-9);
        assert!((summary.water_volume_ml - 0.2).abs() < 1e-9);
        assert_eq!(summary.ethanol_ticks, 2);
        assert_eq!(summary.water_ticks, 1);
        assert!((summary.total_volume_ml - 0.8).abs() < 1e-9);
        assert_eq!(summary.verdict, Verdict::Incorrect);
    }

    #[test]
    fn analysis_is_repeatable() {
        let config = LabConfig::default();
        let history = vec![sample(1, 79.0, 3, 0.3), sample(2, 79.5, 3, 0.6)];
        let first = analyze(&history, &config, Some(Hypothesis::EthanolFirst));
        let second = analyze(&history, &config, Some(Hypothesis::EthanolFirst));
        assert_eq!(first, second);
        assert_eq!(first.verdict, Verdict::Correct);
    }

    #[test]
    fn empty_history_yields_zero_volumes() {
        let summary = analyze(&[], &LabConfig::default(), None);
        assert_eq!(summary.ethanol_volume_ml, 0.0);
        assert_eq!(summary.water_volume_ml, 0.0);
        assert_eq!(summary.total_volume_ml, 0.0);
    }

    #[test]
    fn hypothesis_ids_parse() {
        for h in Hypothesis::ALL {
            assert_eq!(Hypothesis::from_id(h.id()), Some(h));
        }
        assert_eq!(Hypothesis::from_id("both"), None);
    }
}
