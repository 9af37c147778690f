//*** START FILE: src/parsing/mod.rs ***//
pub mod lesson_parser;

// Re-export the main parsing function for convenience
pub use lesson_parser::{parse_lesson_text, BUNDLED_LESSON};
//*** END FILE: src/parsing/mod.rs ***//
