//! Prompt construction for commit message improvement.

/// System prompt sent with every request.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that writes descriptive, \
but concise and improved commit messages for git repositories. You only ever answer \
with the new commit message only, and with no additional comments or statements.";

/// Builds the user prompt embedding the current message and truncated diff.
pub fn user_prompt(current_message: &str, truncated_diff: &str) -> String {
    format!(
        "Improve the following commit message:\n\n'{current_message}'\n\nBased on the following git diff:{truncated_diff}\n\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_prompt_embeds_message_and_diff() {
        let prompt = user_prompt("fix stuff", "+added line");
        assert!(prompt.contains("'fix stuff'"));
        assert!(prompt.contains("+added line"));
        assert!(prompt.starts_with("Improve the following commit message:"));
    }
}
