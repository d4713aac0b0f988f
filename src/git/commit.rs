//! Commit metadata and diff extraction.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use git2::{Commit, DiffOptions, Repository};
use serde::{Deserialize, Serialize};

/// Information about a single commit selected for rewriting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Full SHA-1 hash of the commit.
    pub hash: String,
    /// Commit author name and email address.
    pub author: String,
    /// Commit date in ISO format with timezone.
    pub date: DateTime<FixedOffset>,
    /// The original commit message as written by the author.
    pub message: String,
    /// Unified diff against the commit's parent, with zero context lines.
    pub diff: String,
}

impl CommitInfo {
    /// Builds a `CommitInfo` from a `git2::Commit`.
    pub fn from_git_commit(repo: &Repository, commit: &Commit) -> Result<Self> {
        let hash = commit.id().to_string();

        let author = format!(
            "{} <{}>",
            commit.author().name().unwrap_or("Unknown"),
            commit.author().email().unwrap_or("unknown@example.com")
        );

        let timestamp = commit.author().when();
        let date = DateTime::from_timestamp(timestamp.seconds(), 0)
            .context("Invalid commit timestamp")?
            .with_timezone(
                &FixedOffset::east_opt(timestamp.offset_minutes() * 60)
                    .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap()),
            );

        let message = commit.message().unwrap_or("").to_string();

        let diff = diff_content(repo, commit)?;

        Ok(Self {
            hash,
            author,
            date,
            message,
            diff,
        })
    }

    /// Returns the abbreviated commit hash.
    pub fn short_hash(&self) -> &str {
        &self.hash[..crate::git::SHORT_HASH_LEN.min(self.hash.len())]
    }
}

/// Renders the commit's diff against its sole parent as patch text.
///
/// Context lines are suppressed (`--unified=0` equivalent) so only changed
/// lines reach the completion API.
fn diff_content(repo: &Repository, commit: &Commit) -> Result<String> {
    let commit_tree = commit.tree().context("Failed to get commit tree")?;

    let parent_tree = if commit.parent_count() > 0 {
        Some(
            commit
                .parent(0)
                .context("Failed to get parent commit")?
                .tree()
                .context("Failed to get parent tree")?,
        )
    } else {
        None
    };

    let mut opts = DiffOptions::new();
    opts.context_lines(0);

    let diff = repo
        .diff_tree_to_tree(parent_tree.as_ref(), Some(&commit_tree), Some(&mut opts))
        .context("Failed to create diff")?;

    let mut diff_text = String::new();

    diff.print(git2::DiffFormat::Patch, |_delta, _hunk, line| {
        let content = std::str::from_utf8(line.content()).unwrap_or("<binary>");
        let prefix = match line.origin() {
            '+' => "+",
            '-' => "-",
            ' ' => " ",
            '@' => "@",
            _ => "",
        };
        diff_text.push_str(prefix);
        diff_text.push_str(content);
        true
    })
    .context("Failed to format diff")?;

    Ok(diff_text)
}
