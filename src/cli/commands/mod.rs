//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a specific CLI command.

pub mod config;
pub mod inspect;
pub mod process;

// Re-export argument types for use in mod.rs
pub use config::ConfigArgs;
pub use inspect::InspectArgs;
pub use process::ProcessArgs;
