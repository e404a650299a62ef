//! Batch runner, prompts and logging for the `annolayer` command.

pub mod logging;
pub mod pipeline;
pub mod prompt;
pub mod schema;
pub mod types;
