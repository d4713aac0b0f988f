//! Shared utilities.

pub mod settings;

pub use settings::{get_env_var, Settings};
