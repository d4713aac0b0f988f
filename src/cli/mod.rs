//! CLI interface for git-reword.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use crate::git::{GitRepository, HistoryRewriter};
use crate::llm::truncate::DEFAULT_MAX_DIFF_CHARS;
use crate::llm::{CompletionClient, CompletionError};
use crate::utils::settings;

/// git-reword: rewrite commit history with AI-improved messages.
#[derive(Parser)]
#[command(name = "git-reword")]
#[command(about = "Rewrites git commit messages using a completion API", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the git repository to rewrite.
    #[arg(value_name = "REPO_PATH")]
    pub repo_path: PathBuf,

    /// Earliest commit to rewrite; all commits from it to HEAD are
    /// processed. Defaults to the whole current branch.
    #[arg(value_name = "START_COMMIT")]
    pub start_commit: Option<String>,

    /// Completion model to use.
    #[arg(long, default_value = "gpt-3.5-turbo")]
    pub model: String,

    /// Maximum diff length in characters before truncation.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DIFF_CHARS)]
    pub max_diff_chars: usize,

    /// OpenAI-compatible API base URL override.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Generates and prints replacement messages without rewriting history.
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Executes the rewrite flow.
    pub async fn execute(self) -> Result<()> {
        // Credential check comes first, before the repository is touched.
        let api_key = settings::get_env_var("OPENAI_API_KEY")
            .map_err(|_| CompletionError::ApiKeyNotFound)?;

        if !self.repo_path.is_dir() {
            anyhow::bail!("Invalid directory path: {}", self.repo_path.display());
        }

        let repo = GitRepository::open_at(&self.repo_path)?;
        let branch = repo.current_branch()?;
        debug!(branch = %branch, "Resolved current branch");

        let commits = repo.commits_since(self.start_commit.as_deref())?;
        if commits.is_empty() {
            println!("No commits to rewrite on '{branch}'.");
            return Ok(());
        }
        println!("Found {} commits to rewrite on '{}'", commits.len(), branch);

        let client = CompletionClient::new(
            self.model.clone(),
            api_key,
            self.base_url.clone(),
            self.max_diff_chars,
        );

        let mut commit_hashes = Vec::with_capacity(commits.len());
        let mut new_messages = Vec::with_capacity(commits.len());

        for commit in &commits {
            let new_message = client
                .improve_message(&commit.diff, commit.message.trim())
                .await?;

            println!(
                "[{}] Old message: {}\n[{}] New message: {}\n",
                commit.short_hash(),
                commit.message.trim(),
                commit.short_hash(),
                new_message.trim()
            );

            commit_hashes.push(commit.hash.clone());
            new_messages.push(new_message);
        }

        if self.dry_run {
            println!("Dry run: no history was rewritten.");
            return Ok(());
        }

        let rewriter = HistoryRewriter::open_at(&self.repo_path)?;
        rewriter.apply_messages(&commit_hashes, &new_messages)
    }
}
