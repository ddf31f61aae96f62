pub mod commands;
pub mod engine;

pub use commands::{Command, CommandStack};
pub use engine::{EditEngine, GraphMutation};
