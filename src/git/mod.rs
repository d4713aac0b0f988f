//! Git operations: repository access, commit enumeration, history rewrite.

use anyhow::{Context, Result};
use git2::Repository;

pub mod commit;
pub mod repository;
pub mod rewrite;

pub use commit::CommitInfo;
pub use repository::GitRepository;
pub use rewrite::HistoryRewriter;

/// Number of hex characters to show in abbreviated commit hashes.
pub const SHORT_HASH_LEN: usize = 8;

/// Checks that a repository's working directory has no uncommitted changes.
///
/// A hard reset of the original branch would clobber local modifications,
/// so the rewrite refuses to promote over a dirty tree.
pub fn check_working_directory_clean(repo: &Repository) -> Result<()> {
    let statuses = repo
        .statuses(None)
        .context("Failed to get repository status")?;

    let dirty = statuses
        .iter()
        .any(|entry| !entry.status().is_ignored());

    if dirty {
        anyhow::bail!(
            "Working directory is not clean. Please commit or stash changes before rewriting commit messages."
        );
    }

    Ok(())
}
