//*** START FILE: src/simulation/mod.rs ***//
pub mod analysis;
pub mod core_algo;
pub mod numerical_types;
pub mod simulator;

// Re-export key items that the shell and the binary use
pub use analysis::{analyze, verdict, AnalysisSummary, Hypothesis, Verdict};
pub use numerical_types::{CollectionWindow, HeatIntensity, Observation, RunState, SimulationSample};
pub use simulator::Simulator;
//*** END FILE: src/simulation/mod.rs ***//
