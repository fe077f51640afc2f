//*** START FILE: src/lib.rs ***//

// Declare all modules that are part of this library
pub mod config;
pub mod error;
pub mod gui;
pub mod headless;
pub mod lesson;
pub mod parsing;
pub mod simulation;
pub mod wizard;

pub use config::LabConfig;
pub use wizard::WizardShell;

//*** END FILE: src/lib.rs ***//
