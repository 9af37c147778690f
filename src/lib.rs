//*** START FILE: src/lib.rs ***//

// Library modules. The binary in main.rs only adds the window and the CLI.
pub mod config;
pub mod error;
pub mod types {
    pub mod lesson;
}
pub mod parsing;
pub mod dictionary;
pub mod profile;
pub mod reader;
pub mod session;

pub use config::Config;
pub use session::{Highlight, PointerTarget, ReadingSession};
pub use types::lesson::{Lesson, Word, WordId};

//*** END FILE: src/lib.rs ***//
