//! Data model for merge requests and their changes, as served by GitLab.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A unique reference to a merge request.
///
/// * `project_id` – numeric GitLab project ID.
/// * `iid`        – MR IID (per-project sequence number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequestId {
    pub project_id: u64,
    pub iid: u64,
}

impl fmt::Display for ChangeRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "project {} !{}", self.project_id, self.iid)
    }
}

/// Response of `GET /projects/:id/merge_requests/:iid/changes` (subset).
///
/// `changes` is mandatory: a body without it is rejected rather than
/// reviewed as an empty diff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MrChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_branch: Option<String>,
    pub changes: Vec<FileChange>,
}

impl MrChanges {
    /// Total number of lines across all file diffs.
    pub fn diff_line_count(&self) -> usize {
        self.changes.iter().map(|c| c.diff.lines().count()).sum()
    }
}

/// File-level change with its unified diff text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileChange {
    pub old_path: String,
    pub new_path: String,
    #[serde(default)]
    pub new_file: bool,
    #[serde(default)]
    pub renamed_file: bool,
    #[serde(default)]
    pub deleted_file: bool,
    /// Unified diff; empty for binary or oversized files.
    #[serde(default)]
    pub diff: String,
}

/// Note (comment) as returned by `POST .../notes` (subset).
#[derive(Debug, Clone, Deserialize)]
pub struct MrNote {
    pub id: u64,
}
