//*** START FILE: src/parsing/mod.rs ***//
pub mod lesson_parser;

// Re-export the main parsing functions for convenience
pub use lesson_parser::{builtin_lesson, parse_lesson_file, parse_lesson_text};
//*** END FILE: src/parsing/mod.rs ***//
