//! # git-reword
//!
//! Rewrites git commit history with AI-improved commit messages.
//!
//! The tool walks the current branch oldest-to-newest, extracts each
//! commit's diff, asks an OpenAI-compatible completion API for an improved
//! message, then replays the history onto a rewrite branch and promotes it
//! back onto the original branch.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod git;
pub mod llm;
pub mod utils;

pub use crate::cli::Cli;

/// The current version of git-reword.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
