pub mod content;
pub mod navigator;
pub mod stage;

pub use content::{ContentBlock, LessonContent, StageContent, TermEntry};
pub use navigator::{CompletionState, PhaseNavigator};
pub use stage::Stage;
