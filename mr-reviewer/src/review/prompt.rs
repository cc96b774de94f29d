//! Prompt builder for the single-pass MR review.
//!
//! The diff is embedded as pretty JSON of the GitLab `changes` array, so file
//! paths and flags (new/renamed/deleted) reach the model unchanged.

use git_context_engine::MrChanges;

use crate::errors::MrResult;

/// Line count above which the model is asked to focus on the beginning of the diff.
/// Advisory only: the diff itself is never truncated.
pub const LINE_ADVISORY_LIMIT: usize = 500;

/// System instruction sent alongside every review prompt.
pub const REVIEWER_ROLE: &str = "You are a meticulous code reviewer for GitLab merge requests. \
     Report only findings that matter, cite the file and line, and keep the tone neutral.";

/// Build the review prompt for `changes`.
pub fn build_review_prompt(changes: &MrChanges) -> MrResult<String> {
    let diff_json = serde_json::to_string_pretty(&changes.changes)?;

    let mut s = String::new();
    s.push_str("You are a senior software engineer reviewing a GitLab merge request.\n");
    s.push_str(
        "Review the changes below for correctness, potential bugs, security issues, \
         performance, readability and maintainability.\n",
    );

    if let Some(title) = changes.title.as_deref() {
        s.push_str(&format!("\n# Merge request\nTitle: {title}\n"));
        if let (Some(src), Some(dst)) = (
            changes.source_branch.as_deref(),
            changes.target_branch.as_deref(),
        ) {
            s.push_str(&format!("Branches: {src} -> {dst}\n"));
        }
    }

    s.push_str("\n# Formatting rules\n");
    s.push_str("- Answer in GitHub-flavored Markdown.\n");
    s.push_str("- Start with a short summary, then list findings grouped by file.\n");
    s.push_str("- Reference the file path and line for every finding.\n");
    s.push_str(
        "- Propose concrete fixes as inline suggestions using GitLab suggestion blocks \
         (```suggestion ... ```).\n",
    );
    s.push_str(
        "- Skip praise and restating the diff; if nothing needs changing, say so briefly.\n",
    );

    s.push_str("\n# Naming conventions checklist\n");
    s.push_str(
        "- Variables and functions follow the language's casing convention (camelCase, snake_case, ...).\n",
    );
    s.push_str("- Types, classes and components use PascalCase.\n");
    s.push_str("- Constants use UPPER_SNAKE_CASE.\n");
    s.push_str("- Boolean names read as predicates (is/has/should/can).\n");
    s.push_str(
        "- Names are descriptive; no unexplained abbreviations or single letters outside tiny scopes.\n",
    );
    s.push_str("- File names follow the conventions already used in the repository.\n");

    s.push_str("\n# Size\n");
    s.push_str(&format!(
        "If the diff exceeds {LINE_ADVISORY_LIMIT} lines, focus on the first {LINE_ADVISORY_LIMIT} lines.\n"
    ));

    s.push_str("\n# Changes (GitLab `changes` JSON)\n```json\n");
    s.push_str(&diff_json);
    s.push_str("\n```\n");
    Ok(s)
}

#[cfg(test)]
mod tests {
    use git_context_engine::git_providers::FileChange;

    use super::*;

    fn changes() -> MrChanges {
        MrChanges {
            title: Some("Add retry helper".into()),
            source_branch: Some("feature/retry".into()),
            target_branch: Some("main".into()),
            changes: vec![FileChange {
                old_path: "src/net.rs".into(),
                new_path: "src/net.rs".into(),
                new_file: false,
                renamed_file: false,
                deleted_file: false,
                diff: "@@ -1,2 +1,3 @@\n fn a() {}\n+fn retryCount() {}\n".into(),
            }],
        }
    }

    #[test]
    fn embeds_serialized_changes() {
        let prompt = build_review_prompt(&changes()).unwrap();
        assert!(prompt.contains("\"new_path\": \"src/net.rs\""));
        assert!(prompt.contains("+fn retryCount() {}\\n"));
        assert!(prompt.contains("Branches: feature/retry -> main"));
    }

    #[test]
    fn carries_rules_checklist_and_size_advisory() {
        let prompt = build_review_prompt(&changes()).unwrap();
        assert!(prompt.contains("```suggestion"));
        assert!(prompt.contains("# Naming conventions checklist"));
        assert!(prompt.contains("focus on the first 500 lines"));
    }

    #[test]
    fn empty_change_list_still_builds() {
        let mut c = changes();
        c.title = None;
        c.changes.clear();
        let prompt = build_review_prompt(&c).unwrap();
        assert!(prompt.contains("```json\n[]\n```"));
        assert!(!prompt.contains("# Merge request"));
    }
}
