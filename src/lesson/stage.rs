use serde::{Deserialize, Serialize};

/// One step of the lesson, in presentation order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Theory,
    Materials,
    Safety,
    Variables,
    Setup,
    Hypothesis,
    Experiment,
    Observation,
    Analysis,
    Errors,
    Evaluation,
}

impl Stage {
    pub const ALL: [Stage; 11] = [
        Stage::Theory,
        Stage::Materials,
        Stage::Safety,
        Stage::Variables,
        Stage::Setup,
        Stage::Hypothesis,
        Stage::Experiment,
        Stage::Observation,
        Stage::Analysis,
        Stage::Errors,
        Stage::Evaluation,
    ];

    pub fn position(self) -> usize {
        self as usize
    }

    pub fn id(self) -> &'static str {
        match self {
            Stage::Theory => "theory",
            Stage::Materials => "materials",
            Stage::Safety => "safety",
            Stage::Variables => "variables",
            Stage::Setup => "setup",
            Stage::Hypothesis => "hypothesis",
            Stage::Experiment => "experiment",
            Stage::Observation => "observation",
            Stage::Analysis => "analysis",
            Stage::Errors => "errors",
            Stage::Evaluation => "evaluation",
        }
    }

    /// Title used when the lesson file gives none.
    pub fn default_title(self) -> &'static str {
        match self {
            Stage::Theory => "Learning Outcome and Aim",
            Stage::Materials => "Materials",
            Stage::Safety => "Safety",
            Stage::Variables => "Variables",
            Stage::Setup => "Apparatus Setup",
            Stage::Hypothesis => "Hypothesis",
            Stage::Experiment => "Experiment",
            Stage::Observation => "Observation",
            Stage::Analysis => "Analysis",
            Stage::Errors => "Sources of Error",
            Stage::Evaluation => "Evaluation",
        }
    }

    pub fn from_id(id: &str) -> Option<Stage> {
        let id = id.trim();
        Stage::ALL.iter().copied().find(|stage| stage.id().eq_ignore_ascii_case(id))
    }
}
