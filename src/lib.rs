// Library surface for headless/integration tests and reuse.
// main.rs only adds the CLI and the interactive setup questions.
pub mod app_dirs;
pub mod config;
pub mod console;
pub mod dataset;
pub mod error;
pub mod grader;
pub mod report;
pub mod runner;
pub mod selector;
pub mod session;
pub mod stats;
pub mod store;

pub use error::{QuizError, Result};
