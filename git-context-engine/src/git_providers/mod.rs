//! Git provider layer.
//!
//! Only GitLab is supported; [`ProviderConfig`] carries the API base and the
//! access token read at startup.

pub mod types;
pub use types::*;

pub mod gitlab;

/// Runtime configuration for the GitLab client.
///
/// Both fields are optional at startup; [`gitlab::GitLabClient::from_config`]
/// reports what is missing when a review actually needs them.
#[derive(Clone, Default)]
pub struct ProviderConfig {
    /// API base, e.g. "https://gitlab.com/api/v4".
    pub base_api: Option<String>,
    /// Access token sent as `PRIVATE-TOKEN`.
    pub token: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_api", &self.base_api)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}
