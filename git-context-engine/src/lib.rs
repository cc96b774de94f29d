//! GitLab access for the review hook: fetch merge request changes and post
//! review notes.

pub mod errors;
pub mod git_providers;

pub use errors::{
    GitContextEngineConfigError, GitContextEngineError, GitContextEngineProviderError,
    GitContextEngineResult,
};
pub use git_providers::{ChangeRequestId, MrChanges, ProviderConfig, gitlab::GitLabClient};
