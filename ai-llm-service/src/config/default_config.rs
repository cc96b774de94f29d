//! LLM config resolved from environment variables.
//!
//! The provider is selected with `LLM_KIND` (`gemini` by default) and each
//! provider reads its own block of variables:
//!
//! Common:
//! - `LLM_KIND`         = `gemini` | `openai` | `ollama`
//! - `LLM_MAX_TOKENS`   = optional max tokens (u32)
//! - `LLM_TIMEOUT_SECS` = optional request timeout (u64, default 600)
//!
//! Gemini:
//! - `GEMINI_API_KEY` (checked lazily, see below)
//! - `GEMINI_MODEL`   (default `gemini-1.5-flash`)
//! - `GEMINI_URL`     (default `https://generativelanguage.googleapis.com`)
//!
//! OpenAI:
//! - `OPENAI_API_KEY` (checked lazily)
//! - `OPENAI_MODEL`   (default `gpt-4o-mini`)
//! - `OPENAI_URL`     (default `https://api.openai.com`)
//!
//! Ollama:
//! - `OLLAMA_URL` or `OLLAMA_PORT` (mandatory)
//! - `OLLAMA_MODEL`                (mandatory)
//!
//! A missing API key is not a startup error: the provider client refuses to
//! initialize on first use instead, so the failure shows up per review.

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        ConfigError, must_var, opt_u32_var, opt_u64_var, opt_var, validate_http_endpoint,
    },
};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Builds the review model config from an arbitrary variable source.
///
/// # Errors
/// - [`ConfigError::UnsupportedProvider`] for an unknown `LLM_KIND`
/// - [`ConfigError::InvalidNumber`] for malformed numeric variables
/// - [`ConfigError::MissingVar`] for mandatory Ollama variables
/// - [`ConfigError::InvalidFormat`] for endpoints without http/https
pub fn config_from_vars<F>(vars: &F) -> Result<LlmModelConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let provider = match opt_var(vars, "LLM_KIND") {
        Some(kind) => kind.parse::<LlmProvider>()?,
        None => LlmProvider::Gemini,
    };
    let max_tokens = opt_u32_var(vars, "LLM_MAX_TOKENS")?;
    let timeout_secs = opt_u64_var(vars, "LLM_TIMEOUT_SECS")?.or(Some(DEFAULT_TIMEOUT_SECS));

    let (model, endpoint, api_key) = match provider {
        LlmProvider::Gemini => {
            let endpoint =
                opt_var(vars, "GEMINI_URL").unwrap_or_else(|| DEFAULT_GEMINI_URL.to_string());
            validate_http_endpoint("GEMINI_URL", &endpoint)?;
            (
                opt_var(vars, "GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                endpoint,
                opt_var(vars, "GEMINI_API_KEY"),
            )
        }
        LlmProvider::OpenAI => {
            let endpoint =
                opt_var(vars, "OPENAI_URL").unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string());
            validate_http_endpoint("OPENAI_URL", &endpoint)?;
            (
                opt_var(vars, "OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
                endpoint,
                opt_var(vars, "OPENAI_API_KEY"),
            )
        }
        LlmProvider::Ollama => (
            must_var(vars, "OLLAMA_MODEL")?,
            ollama_endpoint(vars)?,
            None,
        ),
    };

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens,
        temperature: Some(0.2),
        top_p: None,
        timeout_secs,
    })
}

/// Resolves the Ollama endpoint.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
fn ollama_endpoint<F>(vars: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = opt_var(vars, "OLLAMA_URL") {
        validate_http_endpoint("OLLAMA_URL", &url)?;
        return Ok(url);
    }
    if let Some(port) = opt_var(vars, "OLLAMA_PORT") {
        port.parse::<u16>().map_err(|_| ConfigError::InvalidNumber {
            var: "OLLAMA_PORT",
            reason: "expected u16 (1..=65535)",
        })?;
        return Ok(format!("http://localhost:{port}"));
    }
    Err(ConfigError::MissingVar("OLLAMA_URL or OLLAMA_PORT"))
}
