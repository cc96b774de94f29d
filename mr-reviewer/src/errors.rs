//! Crate-wide error hierarchy for mr-reviewer.
//!
//! Every variant names the pipeline step that failed, so a single log line
//! tells which outbound call broke the review.

use ai_llm_service::AiLlmError;
use git_context_engine::GitContextEngineError;
use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type MrResult<T> = Result<T, ReviewError>;

/// Root error type for the mr-reviewer crate.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// GitLab base URL or token is not configured.
    #[error("gitlab is not configured: {0}")]
    Config(#[source] GitContextEngineError),

    /// Step 1: the MR changes could not be fetched or decoded.
    #[error("fetching diff failed: {0}")]
    FetchDiff(#[source] GitContextEngineError),

    /// Step 2: the changes could not be serialized into the prompt.
    #[error("building prompt failed: {0}")]
    Prompt(#[from] serde_json::Error),

    /// Step 3: the LLM call failed.
    #[error("llm call failed: {0}")]
    Llm(#[from] AiLlmError),

    /// Step 4: the note could not be posted.
    #[error("posting comment failed: {0}")]
    PostNote(#[source] GitContextEngineError),

    /// The shared HTTP client could not be built.
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
}
