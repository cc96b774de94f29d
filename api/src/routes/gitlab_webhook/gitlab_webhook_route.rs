use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use tracing::{info, instrument, warn};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::gitlab_webhook::gate::{self, GateDecision},
};

/// POST /gitlab-webhook
///
/// Gates the delivery and, for open/update merge request events, runs the
/// review pipeline. Pipeline failures are logged and never change the
/// response: an accepted delivery is always `202`.
///
/// With `review_in_background` the pipeline is spawned and the response is
/// sent right away; otherwise the response waits for the pipeline.
#[instrument(name = "gitlab_webhook", skip_all)]
pub async fn gitlab_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<(StatusCode, String)> {
    let accepted = match gate::evaluate(&state.config.webhook_secret, &headers, &body) {
        GateDecision::Unauthorized => {
            warn!("webhook rejected: missing or invalid token");
            return Err(AppError::Unauthorized);
        }
        GateDecision::Ignored(reason) => {
            info!(%reason, "webhook ignored");
            return Ok((StatusCode::OK, format!("ignored: {reason}")));
        }
        GateDecision::Invalid(reason) => {
            warn!(%reason, "webhook payload rejected");
            return Err(AppError::BadRequest(reason));
        }
        GateDecision::Review(ev) => ev,
    };

    let id = accepted.id;
    info!(
        project_id = id.project_id,
        iid = id.iid,
        action = accepted.action.as_str(),
        user = accepted.username.as_deref().unwrap_or("-"),
        source_branch = accepted.source_branch.as_deref().unwrap_or("-"),
        target_branch = accepted.target_branch.as_deref().unwrap_or("-"),
        background = state.config.review_in_background,
        "merge request review accepted"
    );

    if state.config.review_in_background {
        let reviewer = Arc::clone(&state.reviewer);
        tokio::spawn(async move { reviewer.run_and_report(id).await });
    } else {
        state.reviewer.run_and_report(id).await;
    }

    Ok((StatusCode::ACCEPTED, format!("review accepted for {id}")))
}
