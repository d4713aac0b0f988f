//! Destructive history rewrite via cherry-pick replay.
//!
//! The rewrite never touches the working tree or any branch ref while
//! replaying: each commit is cherry-picked in memory onto the previously
//! rewritten commit and committed directly with its replacement message.
//! Only after the full chain is built and validated is the original branch
//! hard-reset to the rewritten tip. On a mid-replay failure the partial
//! rewrite branch is surfaced for inspection and the original branch is
//! left untouched.

use anyhow::{Context, Result};
use git2::{Commit, Oid, Repository, ResetType};
use tracing::debug;

use crate::git::SHORT_HASH_LEN;

/// Suffix appended to the original branch name for the rewrite branch.
const REWRITE_BRANCH_SUFFIX: &str = "-reword";

/// History rewrite handler.
pub struct HistoryRewriter {
    repo: Repository,
}

impl HistoryRewriter {
    /// Creates a rewriter for the repository at the given path.
    pub fn open_at<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path).context("Failed to open git repository")?;
        Ok(Self { repo })
    }

    /// Replaces the messages of the given commits on the current branch.
    ///
    /// `commit_hashes` must list the commits oldest first, ending at the
    /// branch tip, and match `new_messages` in length; either violation
    /// aborts before any mutation.
    /// On success the current branch points at the rewritten history and
    /// the rewrite branch is kept for inspection.
    pub fn apply_messages(&self, commit_hashes: &[String], new_messages: &[String]) -> Result<()> {
        if commit_hashes.len() != new_messages.len() {
            anyhow::bail!(
                "The number of commit hashes and new messages must be the same ({} hashes, {} messages)",
                commit_hashes.len(),
                new_messages.len()
            );
        }

        if commit_hashes.is_empty() {
            println!("No commits to rewrite.");
            return Ok(());
        }

        let current_branch = self.current_branch()?;
        let rewrite_branch = format!("{current_branch}{REWRITE_BRANCH_SUFFIX}");

        if self
            .repo
            .find_branch(&rewrite_branch, git2::BranchType::Local)
            .is_ok()
        {
            anyhow::bail!(
                "Branch '{}' already exists; delete it before rewriting",
                rewrite_branch
            );
        }

        // The final promotion is a hard reset of the current branch, which
        // would clobber uncommitted changes.
        crate::git::check_working_directory_clean(&self.repo)?;

        let commits = self.resolve_commits(commit_hashes)?;

        // The range must reach the branch tip: promoting a shorter chain
        // would hard-reset away every descendant of the last rewritten
        // commit. This also catches commits landing on the branch between
        // enumeration and rewrite.
        let head_oid = self.head_oid()?;
        let range_tip = commits[commits.len() - 1].id();
        if range_tip != head_oid {
            anyhow::bail!(
                "The last commit to rewrite ({}) is not the tip of '{}'",
                &range_tip.to_string()[..SHORT_HASH_LEN],
                current_branch
            );
        }

        let base = commits[0].parent(0).ok();

        let tip = self.replay(&commits, new_messages, base.as_ref(), &rewrite_branch)?;

        self.validate_chain(tip, base.as_ref().map(Commit::id), commits.len())?;

        // HEAD may have moved while the chain was being replayed; the
        // reset below must only ever discard commits that were rewritten.
        if self.head_oid()? != head_oid {
            anyhow::bail!(
                "Branch '{}' moved during the rewrite; aborting without touching it",
                current_branch
            );
        }

        let tip_commit = self.repo.find_commit(tip).context("Failed to find rewritten tip")?;
        self.repo
            .branch(&rewrite_branch, &tip_commit, false)
            .with_context(|| format!("Failed to create branch '{rewrite_branch}'"))?;

        // Promote: HEAD still points at the original branch, so a hard
        // reset repoints it and updates the working tree in one step.
        self.repo
            .reset(tip_commit.as_object(), ResetType::Hard, None)
            .with_context(|| format!("Failed to reset '{current_branch}' to rewritten history"))?;

        println!(
            "✅ Rewrote {} commits on '{}' (rewrite branch '{}' kept for inspection)",
            commits.len(),
            current_branch,
            rewrite_branch
        );

        Ok(())
    }

    /// Returns the commit OID HEAD currently points at.
    fn head_oid(&self) -> Result<Oid> {
        Ok(self
            .repo
            .head()
            .context("Failed to get HEAD")?
            .peel_to_commit()
            .context("Failed to peel HEAD to commit")?
            .id())
    }

    /// Returns the current branch name, rejecting detached HEAD.
    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head().context("Failed to get HEAD reference")?;

        match head.shorthand() {
            Some(name) if name != "HEAD" => Ok(name.to_string()),
            _ => anyhow::bail!("Repository is in detached HEAD state"),
        }
    }

    /// Resolves commit hashes to commits, rejecting merges.
    fn resolve_commits<'r>(&'r self, commit_hashes: &[String]) -> Result<Vec<Commit<'r>>> {
        let mut commits = Vec::with_capacity(commit_hashes.len());

        for hash in commit_hashes {
            let oid =
                Oid::from_str(hash).with_context(|| format!("Invalid commit hash: {hash}"))?;
            let commit = self
                .repo
                .find_commit(oid)
                .with_context(|| format!("Commit not found: {hash}"))?;

            if commit.parent_count() > 1 {
                anyhow::bail!(
                    "Commit {} is a merge commit; only linear history can be rewritten",
                    &hash[..SHORT_HASH_LEN.min(hash.len())]
                );
            }

            commits.push(commit);
        }

        Ok(commits)
    }

    /// Replays each commit onto the rewritten chain with its new message.
    ///
    /// Returns the OID of the rewritten tip. On a conflict the rewrite
    /// branch is created at the last successfully replayed commit and the
    /// replay stops with an error naming it.
    fn replay<'r>(
        &'r self,
        commits: &[Commit<'r>],
        new_messages: &[String],
        base: Option<&Commit<'r>>,
        rewrite_branch: &str,
    ) -> Result<Oid> {
        let mut new_parent: Option<Commit<'r>> = base.cloned();
        let mut last_good: Option<Oid> = None;

        for (commit, message) in commits.iter().zip(new_messages) {
            let tree = match &new_parent {
                Some(parent) => {
                    // In-memory cherry-pick: merges the commit's change onto
                    // the rewritten parent without touching the working tree.
                    let mut index = self
                        .repo
                        .cherrypick_commit(commit, parent, 0, None)
                        .with_context(|| {
                            format!("Failed to cherry-pick commit {}", commit.id())
                        })?;

                    if index.has_conflicts() {
                        self.surface_partial_branch(rewrite_branch, last_good)?;
                        anyhow::bail!(
                            "Failed to amend commit {}: cherry-pick conflict",
                            &commit.id().to_string()[..SHORT_HASH_LEN]
                        );
                    }

                    let tree_id = index
                        .write_tree_to(&self.repo)
                        .context("Failed to write cherry-picked tree")?;
                    self.repo
                        .find_tree(tree_id)
                        .context("Failed to find cherry-picked tree")?
                }
                // Root commit: its change set is its whole tree.
                None => commit.tree().context("Failed to get root commit tree")?,
            };

            let parents: Vec<&Commit<'_>> = new_parent.iter().collect();
            let new_oid = self
                .repo
                .commit(
                    None,
                    &commit.author(),
                    &commit.committer(),
                    message,
                    &tree,
                    &parents,
                )
                .with_context(|| format!("Failed to rewrite commit {}", commit.id()))?;

            debug!(
                old = %commit.id(),
                new = %new_oid,
                "Replayed commit with replacement message"
            );
            println!(
                "Reworded {} -> {}",
                &commit.id().to_string()[..SHORT_HASH_LEN],
                &new_oid.to_string()[..SHORT_HASH_LEN]
            );

            last_good = Some(new_oid);
            new_parent = Some(
                self.repo
                    .find_commit(new_oid)
                    .context("Failed to find rewritten commit")?,
            );
        }

        last_good.context("No commits were replayed")
    }

    /// Creates the rewrite branch at the last good commit after a failure.
    fn surface_partial_branch(&self, rewrite_branch: &str, last_good: Option<Oid>) -> Result<()> {
        if let Some(oid) = last_good {
            let commit = self.repo.find_commit(oid)?;
            self.repo.branch(rewrite_branch, &commit, false)?;
            eprintln!(
                "Partial rewrite left on branch '{}' for inspection; '{}' is unchanged",
                rewrite_branch,
                self.current_branch().unwrap_or_default()
            );
        }
        Ok(())
    }

    /// Validates the rewritten chain before the original branch is moved.
    ///
    /// Walks from the rewritten tip down to the base and requires the same
    /// commit count as the input, with a single parent per commit.
    fn validate_chain(&self, tip: Oid, base: Option<Oid>, expected: usize) -> Result<()> {
        let mut count = 0usize;
        let mut cursor = self.repo.find_commit(tip)?;

        loop {
            count += 1;
            match cursor.parent_count() {
                0 => {
                    if base.is_some() {
                        anyhow::bail!(
                            "Rewritten history does not reach the expected base commit"
                        );
                    }
                    break;
                }
                1 => {
                    let parent = cursor.parent(0)?;
                    if Some(parent.id()) == base {
                        break;
                    }
                    cursor = parent;
                }
                _ => anyhow::bail!("Rewritten history unexpectedly contains a merge commit"),
            }

            if count > expected {
                anyhow::bail!(
                    "Rewritten history has more commits than expected ({} > {})",
                    count,
                    expected
                );
            }
        }

        if count != expected {
            anyhow::bail!(
                "Rewritten history has {} commits, expected {}",
                count,
                expected
            );
        }

        debug!(tip = %tip, commits = count, "Validated rewritten chain");
        Ok(())
    }
}
