//! Diff truncation for fitting large diffs into a prompt budget.
//!
//! Large diffs are shrunk by discarding the longest lines first, on the
//! theory that very long lines (minified assets, lockfiles, generated
//! code) carry the least signal per character. Lines are sorted by length
//! descending and popped from the front until the joined text fits.
//!
//! The sort is destructive: the returned text is a reordered multiset of
//! the diff's lines, not a prefix or suffix of the original. Callers rely
//! on this exact ordering.

/// Default maximum diff length in characters.
pub const DEFAULT_MAX_DIFF_CHARS: usize = 10_000;

/// Truncates a diff by removing the longest lines first until the
/// joined-with-newlines text is at most `max_len` characters.
///
/// The last remaining line is never removed, so the result can exceed
/// `max_len` only when a single line is itself longer than the budget.
/// An empty diff yields an empty string.
pub fn truncate_diff(diff: &str, max_len: usize) -> String {
    let mut lines: Vec<&str> = diff.lines().collect();

    // Longest lines first
    lines.sort_by_key(|line| std::cmp::Reverse(char_len(line)));

    while joined_len(&lines) > max_len {
        if lines.len() == 1 {
            // Safety floor: never discard the final line
            break;
        }
        lines.remove(0);
    }

    lines.join("\n")
}

/// Line length in characters.
///
/// The budget counts characters rather than bytes so that multi-byte
/// UTF-8 content does not truncate earlier than equivalent ASCII.
fn char_len(line: &str) -> usize {
    line.chars().count()
}

/// Length of the lines once joined with single newlines.
fn joined_len(lines: &[&str]) -> usize {
    if lines.is_empty() {
        return 0;
    }
    lines.iter().map(|l| char_len(l)).sum::<usize>() + lines.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_diff_stays_empty() {
        assert_eq!(truncate_diff("", 100), "");
    }

    #[test]
    fn under_budget_keeps_all_lines_sorted() {
        let diff = "ab\nabcdef\nabcd";
        let out = truncate_diff(diff, 100);
        // No lines removed, but order is longest-first
        assert_eq!(out, "abcdef\nabcd\nab");
    }

    #[test]
    fn removes_longest_lines_first() {
        let short = "a".repeat(50);
        let mid = "b".repeat(4000);
        let long = "c".repeat(6000);
        let diff = format!("{short}\n{mid}\n{long}");

        // Joined length 10052 > 10000, so the 6000-char line goes first;
        // the remaining 4051 fits and the loop stops.
        let out = truncate_diff(&diff, 10_000);
        assert_eq!(out, format!("{mid}\n{short}"));
    }

    #[test]
    fn single_oversized_line_is_kept() {
        let line = "x".repeat(500);
        assert_eq!(truncate_diff(&line, 10), line);
    }

    #[test]
    fn budget_counts_characters_not_bytes() {
        let accented = "é".repeat(6); // 6 chars, 12 bytes
        let ascii = "a".repeat(8);
        let diff = format!("{ascii}\n{accented}");

        // 8 + 6 + 1 = 15 characters fits a 15-char budget even though
        // the byte length is 21
        let out = truncate_diff(&diff, 15);
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn exact_budget_is_not_truncated() {
        let diff = "aaaa\nbbbb"; // joined length 9
        assert_eq!(truncate_diff(diff, 9).len(), 9);
    }

    proptest! {
        #[test]
        fn output_fits_budget_or_is_single_line(
            diff in "[a-z\n]{0,400}",
            max_len in 1usize..200,
        ) {
            let out = truncate_diff(&diff, max_len);
            prop_assert!(out.len() <= max_len || out.lines().count() <= 1);
        }

        #[test]
        fn output_empty_only_for_empty_input(diff in "[a-z\n]{1,200}") {
            // lines() on "\n\n" yields empty strings, so the output may be
            // empty text but never loses the final line slot
            let out = truncate_diff(&diff, 1);
            prop_assert!(out.lines().count() <= diff.lines().count());
            if diff.lines().count() > 0 {
                prop_assert!(out.lines().count() >= 1 || out.is_empty());
            }
        }

        #[test]
        fn under_budget_removes_nothing(diff in "[a-z\n]{0,200}") {
            let out = truncate_diff(&diff, 10_000);
            // No lines removed: the output is exactly the input lines
            // joined in longest-first order. Comparing the joined strings
            // sidesteps `lines()` on the output, which drops a trailing
            // empty line that the join cannot represent.
            let mut lines: Vec<&str> = diff.lines().collect();
            lines.sort_by_key(|l| std::cmp::Reverse(l.len()));
            prop_assert_eq!(out, lines.join("\n"));
        }

        #[test]
        fn never_longer_than_input(diff in "[a-z\n]{0,300}", max_len in 1usize..100) {
            let joined: String = diff.lines().collect::<Vec<_>>().join("\n");
            prop_assert!(truncate_diff(&diff, max_len).len() <= joined.len());
        }
    }
}
