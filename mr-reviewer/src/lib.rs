//! Public entry for the mr-reviewer pipeline.
//!
//! One review is an unbroken sequential chain:
//!
//! 1) **Fetch diff** — `GET .../merge_requests/:iid/changes`
//! 2) **Build prompt** — serialized changes embedded in a fixed template
//! 3) **Invoke LLM** — single text completion (empty is allowed)
//! 4) **Post note** — banner + trimmed review as an MR note
//!
//! Any failure aborts the remaining steps. There are no retries.

pub mod errors;
pub mod publish;
pub mod review;

use std::{sync::Arc, time::Instant};

use ai_llm_service::LlmService;
use git_context_engine::{ChangeRequestId, GitLabClient, ProviderConfig};
use tracing::{error, info, instrument, warn};

pub use errors::{MrResult, ReviewError};
pub use publish::{REVIEW_BANNER, format_note_body};

/// Result of a completed review.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    /// ID of the posted note.
    pub note_id: u64,
    /// Length of the (untrimmed) LLM reply.
    pub review_len: usize,
}

/// Review pipeline with its two collaborators: GitLab and the LLM.
pub struct Reviewer {
    http: reqwest::Client,
    provider: ProviderConfig,
    llm: Arc<LlmService>,
}

impl Reviewer {
    /// Builds the reviewer and its shared HTTP client.
    ///
    /// GitLab settings are validated per review, so a missing token fails
    /// individual reviews instead of startup.
    pub fn new(provider: ProviderConfig, llm: Arc<LlmService>) -> MrResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("mr-review-hook/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            provider,
            llm,
        })
    }

    /// LLM facade used by the pipeline.
    pub fn llm(&self) -> &LlmService {
        &self.llm
    }

    /// Runs the full pipeline for one merge request.
    ///
    /// # Errors
    /// [`ReviewError`] naming the step that failed; later steps are not run.
    #[instrument(name = "review", skip_all, fields(project_id = id.project_id, iid = id.iid))]
    pub async fn run_review(&self, id: ChangeRequestId) -> MrResult<ReviewOutcome> {
        let client = GitLabClient::from_config(self.http.clone(), &self.provider)
            .map_err(ReviewError::Config)?;

        let changes = client
            .fetch_changes(&id)
            .await
            .map_err(ReviewError::FetchDiff)?;
        info!(files = changes.changes.len(), "diff fetched");

        let prompt = review::build_review_prompt(&changes)?;

        let started = Instant::now();
        let reply = self
            .llm
            .generate(&prompt, Some(review::REVIEWER_ROLE))
            .await?;
        if reply.trim().is_empty() {
            warn!("llm returned an empty review; posting banner only");
        }
        info!(
            latency_ms = started.elapsed().as_millis(),
            reply_len = reply.len(),
            "review generated"
        );

        let body = format_note_body(&reply);
        let note = client
            .post_note(&id, &body)
            .await
            .map_err(ReviewError::PostNote)?;

        Ok(ReviewOutcome {
            note_id: note.id,
            review_len: reply.len(),
        })
    }

    /// Runs the pipeline and logs the outcome; errors never leave this call.
    pub async fn run_and_report(&self, id: ChangeRequestId) {
        match self.run_review(id).await {
            Ok(outcome) => info!(
                project_id = id.project_id,
                iid = id.iid,
                note_id = outcome.note_id,
                review_len = outcome.review_len,
                "review posted"
            ),
            Err(err) => error!(
                project_id = id.project_id,
                iid = id.iid,
                error = %err,
                "review aborted"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use ai_llm_service::{LlmModelConfig, LlmProvider};
    use mockito::{Matcher, Server};

    use super::*;

    const ID: ChangeRequestId = ChangeRequestId {
        project_id: 42,
        iid: 7,
    };

    const CHANGES: &str =
        r#"{"iid":7,"changes":[{"old_path":"a.rs","new_path":"a.rs","diff":"+x\n"}]}"#;

    fn reviewer(gitlab: &Server, llm: &Server, token: Option<&str>) -> Reviewer {
        let llm = LlmService::new(LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "qwen3:14b".into(),
            endpoint: llm.url(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(5),
        })
        .unwrap();
        Reviewer::new(
            ProviderConfig {
                base_api: Some(gitlab.url()),
                token: token.map(str::to_string),
            },
            Arc::new(llm),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn posts_banner_and_review() {
        let mut gitlab = Server::new_async().await;
        let mut llm = Server::new_async().await;

        let fetch = gitlab
            .mock("GET", "/projects/42/merge_requests/7/changes")
            .with_status(200)
            .with_body(CHANGES)
            .expect(1)
            .create_async()
            .await;
        let generate = llm
            .mock("POST", "/api/generate")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("a\\.rs".into()),
                Matcher::PartialJson(serde_json::json!({ "system": review::REVIEWER_ROLE })),
            ]))
            .with_status(200)
            .with_body(r#"{"response":"  Rename `x`.\n"}"#)
            .expect(1)
            .create_async()
            .await;
        let note = gitlab
            .mock("POST", "/projects/42/merge_requests/7/notes")
            .match_body(Matcher::Json(serde_json::json!({
                "body": format!("{REVIEW_BANNER}\n\nRename `x`.")
            })))
            .with_status(201)
            .with_body(r#"{"id":5}"#)
            .expect(1)
            .create_async()
            .await;

        let outcome = reviewer(&gitlab, &llm, Some("t"))
            .run_review(ID)
            .await
            .unwrap();

        assert_eq!(outcome.note_id, 5);
        assert_eq!(outcome.review_len, "  Rename `x`.\n".len());
        fetch.assert_async().await;
        generate.assert_async().await;
        note.assert_async().await;
    }

    #[tokio::test]
    async fn missing_token_stops_before_any_call() {
        let mut gitlab = Server::new_async().await;
        let llm = Server::new_async().await;
        let fetch = gitlab
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let err = reviewer(&gitlab, &llm, None).run_review(ID).await.unwrap_err();

        assert!(matches!(err, ReviewError::Config(_)));
        fetch.assert_async().await;
    }

    #[tokio::test]
    async fn llm_failure_skips_note() {
        let mut gitlab = Server::new_async().await;
        let mut llm = Server::new_async().await;
        gitlab
            .mock("GET", "/projects/42/merge_requests/7/changes")
            .with_status(200)
            .with_body(CHANGES)
            .create_async()
            .await;
        llm.mock("POST", "/api/generate")
            .with_status(500)
            .create_async()
            .await;
        let note = gitlab
            .mock("POST", "/projects/42/merge_requests/7/notes")
            .expect(0)
            .create_async()
            .await;

        let err = reviewer(&gitlab, &llm, Some("t")).run_review(ID).await.unwrap_err();

        assert!(matches!(err, ReviewError::Llm(_)));
        note.assert_async().await;
    }
}
