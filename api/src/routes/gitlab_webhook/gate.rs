//! Webhook gate: decides what to do with an inbound GitLab delivery.
//!
//! Checks run in a fixed order and the first failing one wins:
//!
//! 1. `X-Gitlab-Token` equals the configured secret (exact, case-sensitive)
//! 2. `X-Gitlab-Event` is `Merge Request Hook`
//! 3. the body is a JSON merge request event
//! 4. `object_attributes.action` is `open` or `update`
//! 5. `project.id` and `object_attributes.iid` are present
//!
//! [`evaluate`] does no I/O, so every branch is unit-tested here.

use std::fmt;

use axum::http::HeaderMap;
use git_context_engine::ChangeRequestId;

use super::gitlab_webhook_event::{MergeRequestEvent, MrAction};

pub const TOKEN_HEADER: &str = "x-gitlab-token";
pub const EVENT_HEADER: &str = "x-gitlab-event";
pub const MERGE_REQUEST_HOOK: &str = "Merge Request Hook";

/// Outcome of gating one delivery.
#[derive(Debug)]
pub enum GateDecision {
    /// Token header missing or different from the secret.
    Unauthorized,
    /// Authentic, but nothing to review.
    Ignored(IgnoreReason),
    /// Authentic merge request hook that cannot be acted on.
    Invalid(String),
    /// Start a review.
    Review(AcceptedEvent),
}

#[derive(Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// `X-Gitlab-Event` missing or not a merge request hook.
    EventType(Option<String>),
    /// No `object_attributes.action` in the payload.
    MissingAction,
    /// Action other than open/update.
    Action(MrAction),
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreReason::EventType(Some(ev)) => write!(f, "event `{ev}` is not handled"),
            IgnoreReason::EventType(None) => write!(f, "missing {EVENT_HEADER} header"),
            IgnoreReason::MissingAction => write!(f, "merge request event without action"),
            IgnoreReason::Action(a) => write!(f, "action `{}` is not reviewed", a.as_str()),
        }
    }
}

/// What the route needs from an accepted event.
#[derive(Debug)]
pub struct AcceptedEvent {
    pub id: ChangeRequestId,
    pub action: MrAction,
    pub username: Option<String>,
    pub source_branch: Option<String>,
    pub target_branch: Option<String>,
}

/// Gates one delivery. See the module docs for the order of checks.
pub fn evaluate(secret: &str, headers: &HeaderMap, body: &[u8]) -> GateDecision {
    let token = headers.get(TOKEN_HEADER).map(|v| v.as_bytes());
    if token != Some(secret.as_bytes()) {
        return GateDecision::Unauthorized;
    }

    let event = headers
        .get(EVENT_HEADER)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
    if event.as_deref() != Some(MERGE_REQUEST_HOOK) {
        return GateDecision::Ignored(IgnoreReason::EventType(event));
    }

    let payload: MergeRequestEvent = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => return GateDecision::Invalid(format!("malformed JSON body: {e}")),
    };

    let attrs = payload.object_attributes;
    let action = match attrs.as_ref().and_then(|a| a.action) {
        Some(a) if a.is_reviewable() => a,
        Some(a) => return GateDecision::Ignored(IgnoreReason::Action(a)),
        None => return GateDecision::Ignored(IgnoreReason::MissingAction),
    };

    let Some(project_id) = payload.project.and_then(|p| p.id) else {
        return GateDecision::Invalid("missing project.id".into());
    };
    let Some(attrs) = attrs else {
        return GateDecision::Invalid("missing object_attributes".into());
    };
    let Some(iid) = attrs.iid else {
        return GateDecision::Invalid("missing object_attributes.iid".into());
    };

    GateDecision::Review(AcceptedEvent {
        id: ChangeRequestId { project_id, iid },
        action,
        username: payload.user.and_then(|u| u.username.or(u.name)),
        source_branch: attrs.source_branch,
        target_branch: attrs.target_branch,
    })
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use serde_json::json;

    use super::*;

    const SECRET: &str = "s3cret";

    fn headers(token: Option<&str>, event: Option<&str>) -> HeaderMap {
        let mut h = HeaderMap::new();
        if let Some(t) = token {
            h.insert(TOKEN_HEADER, HeaderValue::from_str(t).unwrap());
        }
        if let Some(e) = event {
            h.insert(EVENT_HEADER, HeaderValue::from_str(e).unwrap());
        }
        h
    }

    fn ok_headers() -> HeaderMap {
        headers(Some(SECRET), Some(MERGE_REQUEST_HOOK))
    }

    fn body(action: &str) -> Vec<u8> {
        json!({
            "object_kind": "merge_request",
            "user": { "name": "Jane", "username": "jdoe" },
            "project": { "id": 42, "name": "demo" },
            "object_attributes": {
                "iid": 7, "project_id": 42, "action": action,
                "source_branch": "feature", "target_branch": "main"
            }
        })
        .to_string()
        .into_bytes()
    }

    #[test]
    fn accepts_open_and_update() {
        for action in ["open", "update"] {
            match evaluate(SECRET, &ok_headers(), &body(action)) {
                GateDecision::Review(ev) => {
                    assert_eq!(ev.id, ChangeRequestId { project_id: 42, iid: 7 });
                    assert_eq!(ev.username.as_deref(), Some("jdoe"));
                    assert_eq!(ev.target_branch.as_deref(), Some("main"));
                }
                other => panic!("{action}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn token_must_match_exactly() {
        for token in [None, Some("wrong"), Some("S3CRET"), Some("s3cret ")] {
            assert!(
                matches!(
                    evaluate(SECRET, &headers(token, Some(MERGE_REQUEST_HOOK)), &body("open")),
                    GateDecision::Unauthorized
                ),
                "{token:?}"
            );
        }
    }

    #[test]
    fn token_is_checked_before_anything_else() {
        let decision = evaluate(SECRET, &headers(Some("nope"), Some("Push Hook")), b"not json");
        assert!(matches!(decision, GateDecision::Unauthorized));
    }

    #[test]
    fn other_events_are_ignored() {
        let decision = evaluate(SECRET, &headers(Some(SECRET), Some("Push Hook")), &body("open"));
        assert!(matches!(
            decision,
            GateDecision::Ignored(IgnoreReason::EventType(Some(ref e))) if e == "Push Hook"
        ));

        let decision = evaluate(SECRET, &headers(Some(SECRET), None), &body("open"));
        assert!(matches!(decision, GateDecision::Ignored(IgnoreReason::EventType(None))));
    }

    #[test]
    fn non_reviewable_actions_are_ignored() {
        for action in ["close", "merge", "reopen", "approved", "something-new"] {
            assert!(
                matches!(
                    evaluate(SECRET, &ok_headers(), &body(action)),
                    GateDecision::Ignored(IgnoreReason::Action(_))
                ),
                "{action}"
            );
        }

        let no_action = json!({ "project": { "id": 42 }, "object_attributes": { "iid": 7 } });
        assert!(matches!(
            evaluate(SECRET, &ok_headers(), no_action.to_string().as_bytes()),
            GateDecision::Ignored(IgnoreReason::MissingAction)
        ));
    }

    #[test]
    fn malformed_json_is_invalid() {
        assert!(matches!(
            evaluate(SECRET, &ok_headers(), b"{\"object_kind\":"),
            GateDecision::Invalid(_)
        ));
    }

    #[test]
    fn missing_ids_are_invalid() {
        let no_project = json!({ "object_attributes": { "iid": 7, "action": "open" } });
        match evaluate(SECRET, &ok_headers(), no_project.to_string().as_bytes()) {
            GateDecision::Invalid(msg) => assert!(msg.contains("project.id")),
            other => panic!("unexpected {other:?}"),
        }

        let no_iid = json!({
            "project": { "id": 42 },
            "object_attributes": { "action": "update" }
        });
        match evaluate(SECRET, &ok_headers(), no_iid.to_string().as_bytes()) {
            GateDecision::Invalid(msg) => assert!(msg.contains("iid")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn ignore_reasons_read_well_in_responses() {
        assert_eq!(
            IgnoreReason::Action(MrAction::Merge).to_string(),
            "action `merge` is not reviewed"
        );
        assert_eq!(
            IgnoreReason::EventType(Some("Push Hook".into())).to_string(),
            "event `Push Hook` is not handled"
        );
    }
}
