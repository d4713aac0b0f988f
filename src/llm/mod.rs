//! Completion-API integration for commit message improvement.

pub mod client;
pub mod error;
pub mod prompts;
pub mod truncate;

pub use client::CompletionClient;
pub use error::CompletionError;
pub use truncate::truncate_diff;
