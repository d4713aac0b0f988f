//! Git repository access and commit enumeration.

use anyhow::{Context, Result};
use git2::{Repository, Sort};

use crate::git::CommitInfo;

/// Git repository wrapper.
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Opens the repository at the given path.
    pub fn open_at<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path).context("Failed to open git repository")?;

        Ok(Self { repo })
    }

    /// Returns the current branch name.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.repo.head().context("Failed to get HEAD reference")?;

        if let Some(name) = head.shorthand() {
            if name != "HEAD" {
                return Ok(name.to_string());
            }
        }

        anyhow::bail!("Repository is in detached HEAD state")
    }

    /// Enumerates commits on the current branch, oldest first.
    ///
    /// With a `start_commit`, the walk is limited to `start^..HEAD`, i.e.
    /// the start commit and its descendants. Filtering is ancestry-based:
    /// the start commit must be reachable from HEAD. Merge commits abort
    /// the enumeration since the rewrite only handles linear history.
    pub fn commits_since(&self, start_commit: Option<&str>) -> Result<Vec<CommitInfo>> {
        let head_id = self
            .repo
            .head()
            .context("Failed to get HEAD")?
            .peel_to_commit()
            .context("Failed to peel HEAD to commit")?
            .id();

        let mut walker = self.repo.revwalk().context("Failed to create revwalk")?;
        walker
            .set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)
            .context("Failed to set revwalk sorting")?;
        walker.push(head_id).context("Failed to push HEAD")?;

        if let Some(spec) = start_commit {
            let start = self
                .repo
                .revparse_single(spec)
                .with_context(|| format!("Invalid commit hash {spec}"))?
                .peel_to_commit()
                .with_context(|| format!("{spec} does not refer to a commit"))?;

            let reachable = start.id() == head_id
                || self
                    .repo
                    .graph_descendant_of(head_id, start.id())
                    .context("Failed to check commit ancestry")?;
            if !reachable {
                anyhow::bail!(
                    "Commit {} is not an ancestor of HEAD on the current branch",
                    spec
                );
            }

            for parent in start.parents() {
                walker
                    .hide(parent.id())
                    .context("Failed to limit revwalk to start commit")?;
            }
        }

        let mut commits = Vec::new();

        for oid in walker {
            let oid = oid.context("Failed to get commit OID from walker")?;
            let commit = self
                .repo
                .find_commit(oid)
                .context("Failed to find commit")?;

            if commit.parent_count() > 1 {
                anyhow::bail!(
                    "Commit {} is a merge commit; only linear history can be rewritten",
                    oid
                );
            }

            commits.push(CommitInfo::from_git_commit(&self.repo, &commit)?);
        }

        Ok(commits)
    }
}
