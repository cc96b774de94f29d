//! GitLab provider (REST v4) for MR changes and notes.
//!
//! Endpoints used:
//!   * GET  /projects/:id/merge_requests/:iid/changes
//!   * POST /projects/:id/merge_requests/:iid/notes

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::errors::{
    GitContextEngineConfigError, GitContextEngineProviderError, GitContextEngineResult,
};
use crate::git_providers::{ProviderConfig, types::*};

/// GitLab HTTP client wrapper.
#[derive(Debug, Clone)]
pub struct GitLabClient {
    http: Client,
    base_api: String, // e.g. "https://gitlab.com/api/v4"
    token: String,    // "PRIVATE-TOKEN"
}

impl GitLabClient {
    /// Constructs a GitLab client with a shared HTTP instance and auth token.
    pub fn new(http: Client, base_api: impl Into<String>, token: impl Into<String>) -> Self {
        let base_api = base_api.into().trim_end_matches('/').to_string();
        debug!("Creating GitLabClient with base_api={}", base_api);
        Self {
            http,
            base_api,
            token: token.into(),
        }
    }

    /// Validates `cfg` and builds a client on top of `http`.
    ///
    /// # Errors
    /// [`GitContextEngineConfigError`] when the base URL or token is missing,
    /// or the base URL has no http/https scheme.
    pub fn from_config(http: Client, cfg: &ProviderConfig) -> GitContextEngineResult<Self> {
        let base_api = cfg
            .base_api
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(GitContextEngineConfigError::MissingBaseUrl)?;
        if !(base_api.starts_with("http://") || base_api.starts_with("https://")) {
            return Err(GitContextEngineConfigError::InvalidBaseUrl(base_api.to_string()).into());
        }
        let token = cfg
            .token
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(GitContextEngineConfigError::MissingToken)?;

        Ok(Self::new(http, base_api, token))
    }

    /// `{base}/projects/{id}/merge_requests/{iid}/changes`
    pub fn changes_url(&self, id: &ChangeRequestId) -> String {
        format!(
            "{}/projects/{}/merge_requests/{}/changes",
            self.base_api, id.project_id, id.iid
        )
    }

    /// `{base}/projects/{id}/merge_requests/{iid}/notes`
    pub fn notes_url(&self, id: &ChangeRequestId) -> String {
        format!(
            "{}/projects/{}/merge_requests/{}/notes",
            self.base_api, id.project_id, id.iid
        )
    }

    /// Fetches the MR changes for `id`.
    ///
    /// The body must contain a `changes` array; anything else is reported as
    /// [`GitContextEngineProviderError::InvalidResponse`].
    #[instrument(skip_all, fields(project_id = id.project_id, iid = id.iid))]
    pub async fn fetch_changes(&self, id: &ChangeRequestId) -> GitContextEngineResult<MrChanges> {
        let url = self.changes_url(id);
        debug!("GitLab fetch_changes: {}", url);

        let text = self
            .http
            .get(url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let changes: MrChanges = serde_json::from_str(&text).map_err(|e| {
            GitContextEngineProviderError::InvalidResponse(format!(
                "expected object with `changes` array: {e}"
            ))
        })?;

        debug!(
            files = changes.changes.len(),
            lines = changes.diff_line_count(),
            "GitLab changes fetched"
        );
        Ok(changes)
    }

    /// Posts a general (non-inline) note on the merge request.
    #[instrument(skip_all, fields(project_id = id.project_id, iid = id.iid, body_len = body.len()))]
    pub async fn post_note(
        &self,
        id: &ChangeRequestId,
        body: &str,
    ) -> GitContextEngineResult<MrNote> {
        let url = self.notes_url(id);
        debug!("GitLab post_note: {}", url);

        let text = self
            .http
            .post(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .json(&NoteCreate { body })
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let note: MrNote = serde_json::from_str(&text).map_err(|e| {
            GitContextEngineProviderError::InvalidResponse(format!("expected created note: {e}"))
        })?;
        Ok(note)
    }
}

#[derive(Debug, Serialize)]
struct NoteCreate<'a> {
    body: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GitContextEngineError;

    const ID: ChangeRequestId = ChangeRequestId {
        project_id: 42,
        iid: 7,
    };

    fn client(base: &str) -> GitLabClient {
        GitLabClient::new(Client::new(), base, "glpat-test")
    }

    #[test]
    fn builds_addresses_without_double_slash() {
        let c = client("https://gitlab.example.com/api/v4/");
        assert_eq!(
            c.changes_url(&ID),
            "https://gitlab.example.com/api/v4/projects/42/merge_requests/7/changes"
        );
        assert_eq!(
            c.notes_url(&ID),
            "https://gitlab.example.com/api/v4/projects/42/merge_requests/7/notes"
        );
    }

    #[test]
    fn config_must_name_base_and_token() {
        let http = Client::new();
        let err = GitLabClient::from_config(http.clone(), &ProviderConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            GitContextEngineError::Config(GitContextEngineConfigError::MissingBaseUrl)
        ));

        let cfg = ProviderConfig {
            base_api: Some("https://gitlab.com/api/v4".into()),
            token: Some("  ".into()),
        };
        let err = GitLabClient::from_config(http.clone(), &cfg).unwrap_err();
        assert!(matches!(
            err,
            GitContextEngineError::Config(GitContextEngineConfigError::MissingToken)
        ));

        let cfg = ProviderConfig {
            base_api: Some("gitlab.com/api/v4".into()),
            token: Some("t".into()),
        };
        assert!(GitLabClient::from_config(http, &cfg).is_err());
    }

    #[tokio::test]
    async fn fetch_changes_sends_token_and_decodes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/projects/42/merge_requests/7/changes")
            .match_header("PRIVATE-TOKEN", "glpat-test")
            .with_status(200)
            .with_body(
                r#"{"id":1,"iid":7,"title":"Add parser","changes":[
                    {"old_path":"a.rs","new_path":"a.rs","new_file":false,"renamed_file":false,
                     "deleted_file":false,"diff":"@@ -1 +1 @@\n-a\n+b\n"}]}"#,
            )
            .create_async()
            .await;

        let changes = client(&server.url()).fetch_changes(&ID).await.unwrap();

        mock.assert_async().await;
        assert_eq!(changes.title.as_deref(), Some("Add parser"));
        assert_eq!(changes.changes.len(), 1);
        assert_eq!(changes.diff_line_count(), 3);
    }

    #[tokio::test]
    async fn missing_changes_field_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/projects/42/merge_requests/7/changes")
            .with_status(200)
            .with_body(r#"{"id":1,"iid":7}"#)
            .create_async()
            .await;

        let err = client(&server.url()).fetch_changes(&ID).await.unwrap_err();
        assert!(matches!(
            err,
            GitContextEngineError::Provider(GitContextEngineProviderError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn auth_rejection_maps_to_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/projects/42/merge_requests/7/changes")
            .with_status(401)
            .create_async()
            .await;

        let err = client(&server.url()).fetch_changes(&ID).await.unwrap_err();
        assert!(matches!(
            err,
            GitContextEngineError::Provider(GitContextEngineProviderError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn post_note_sends_body_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/projects/42/merge_requests/7/notes")
            .match_header("PRIVATE-TOKEN", "glpat-test")
            .match_body(mockito::Matcher::Json(serde_json::json!({ "body": "hello" })))
            .with_status(201)
            .with_body(r#"{"id":99,"body":"hello"}"#)
            .create_async()
            .await;

        let note = client(&server.url()).post_note(&ID, "hello").await.unwrap();

        mock.assert_async().await;
        assert_eq!(note.id, 99);
    }
}
