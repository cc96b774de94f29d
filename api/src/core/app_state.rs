use std::sync::Arc;

use ai_llm_service::{LlmModelConfig, LlmProvider, LlmService};
use git_context_engine::ProviderConfig;
use mr_reviewer::{ReviewError, Reviewer};
use thiserror::Error;
use tracing::warn;

/// Port used when neither `API_ADDRESS` nor `PORT` is set.
pub const DEFAULT_PORT: u16 = 3000;

/// Startup configuration errors. Any of these aborts the process.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },

    #[error("invalid boolean in {var}: `{value}` (expected true/false)")]
    InvalidBool { var: &'static str, value: String },

    #[error(transparent)]
    Llm(#[from] ai_llm_service::error_handler::ConfigError),
}

/// Everything the service reads from the environment, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket address to bind, e.g. `0.0.0.0:3000`.
    pub bind_address: String,
    /// Shared secret expected in `X-Gitlab-Token`.
    pub webhook_secret: String,
    /// GitLab API base and token. Validated per review, not here.
    pub gitlab: ProviderConfig,
    /// Model used for reviews.
    pub llm: LlmModelConfig,
    /// Spawn reviews and acknowledge immediately instead of awaiting them.
    pub review_in_background: bool,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&|name: &str| std::env::var(name).ok())
    }

    /// Reads the configuration from an arbitrary variable source.
    ///
    /// # Errors
    /// - [`ConfigError::MissingVar`] when `GITLAB_WEBHOOK_SECRET` is unset
    /// - [`ConfigError::InvalidNumber`] for a malformed `PORT`
    /// - [`ConfigError::InvalidBool`] for a malformed `REVIEW_IN_BACKGROUND`
    /// - [`ConfigError::Llm`] for LLM settings
    pub fn from_vars<F>(vars: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_address = match var(vars, "API_ADDRESS") {
            Some(addr) => addr,
            None => {
                let port = match var(vars, "PORT") {
                    Some(p) => p.parse::<u16>().map_err(|_| ConfigError::InvalidNumber {
                        var: "PORT",
                        reason: "expected u16 (1..=65535)",
                    })?,
                    None => DEFAULT_PORT,
                };
                format!("0.0.0.0:{port}")
            }
        };

        let webhook_secret = var(vars, "GITLAB_WEBHOOK_SECRET")
            .ok_or(ConfigError::MissingVar("GITLAB_WEBHOOK_SECRET"))?;

        let review_in_background = match var(vars, "REVIEW_IN_BACKGROUND") {
            Some(v) => parse_bool("REVIEW_IN_BACKGROUND", &v)?,
            None => true,
        };

        let gitlab = ProviderConfig {
            base_api: var(vars, "GITLAB_API_BASE"),
            token: var(vars, "GITLAB_TOKEN"),
        };

        let llm = ai_llm_service::config::default_config::config_from_vars(vars)?;

        Ok(Self {
            bind_address,
            webhook_secret,
            gitlab,
            llm,
            review_in_background,
        })
    }

    /// Warns about settings that will make every review fail.
    pub fn warn_incomplete(&self) {
        if self.gitlab.base_api.is_none() {
            warn!("GITLAB_API_BASE is not set; reviews will fail until it is configured");
        }
        if self.gitlab.token.is_none() {
            warn!("GITLAB_TOKEN is not set; reviews will fail until it is configured");
        }
        if self.llm.api_key.is_none() && self.llm.provider != LlmProvider::Ollama {
            warn!(
                provider = self.llm.provider.as_str(),
                "LLM API key is not set; reviews will fail until it is configured"
            );
        }
    }
}

/// Shared state for all HTTP handlers.
pub struct AppState {
    pub config: AppConfig,
    pub reviewer: Arc<Reviewer>,
}

impl AppState {
    /// Builds the LLM service and the review pipeline for `config`.
    pub fn new(config: AppConfig) -> Result<Self, ReviewError> {
        let llm = Arc::new(LlmService::new(config.llm.clone())?);
        let reviewer = Arc::new(Reviewer::new(config.gitlab.clone(), llm)?);
        Ok(Self { config, reviewer })
    }
}

fn var<F>(vars: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    vars(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var: name,
            value: value.to_string(),
        }),
    }
}
