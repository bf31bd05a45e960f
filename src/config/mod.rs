//! Configuration module for spendcast
//!
//! Handles path resolution and the user settings file.

pub mod paths;
pub mod settings;

pub use paths::SpendcastPaths;
pub use settings::Settings;
