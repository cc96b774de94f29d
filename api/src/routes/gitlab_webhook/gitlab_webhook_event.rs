use serde::Deserialize;

/// Merge Request Hook payload sent by GitLab.
///
/// Only the fields the gate needs are modelled; everything else is ignored.
/// All fields are optional so that a structurally valid but incomplete event
/// reaches the gate and gets a precise rejection instead of a parse error.
#[derive(Debug, Deserialize)]
pub struct MergeRequestEvent {
    /// Always `merge_request` for this hook.
    pub object_kind: Option<String>,
    pub event_type: Option<String>,
    pub user: Option<EventUser>,
    pub project: Option<EventProject>,
    pub object_attributes: Option<MergeRequestAttributes>,
}

/// Who triggered the event.
#[derive(Debug, Deserialize)]
pub struct EventUser {
    pub name: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EventProject {
    pub id: Option<u64>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MergeRequestAttributes {
    /// Global MR id (not used for API paths).
    pub id: Option<u64>,
    /// Project-scoped MR number used in API paths.
    pub iid: Option<u64>,
    pub project_id: Option<u64>,
    pub source_branch: Option<String>,
    pub target_branch: Option<String>,
    pub action: Option<MrAction>,
}

/// `object_attributes.action` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MrAction {
    Open,
    Update,
    Close,
    Reopen,
    Merge,
    Approved,
    Unapproved,
    #[serde(other)]
    Other,
}

impl MrAction {
    /// Only freshly opened or updated MRs are reviewed.
    pub fn is_reviewable(self) -> bool {
        matches!(self, MrAction::Open | MrAction::Update)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MrAction::Open => "open",
            MrAction::Update => "update",
            MrAction::Close => "close",
            MrAction::Reopen => "reopen",
            MrAction::Merge => "merge",
            MrAction::Approved => "approved",
            MrAction::Unapproved => "unapproved",
            MrAction::Other => "other",
        }
    }
}
