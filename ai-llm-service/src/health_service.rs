//! Health probes for the supported LLM backends.
//!
//! - Gemini: `GET {endpoint}/v1beta/models/{model}` with `x-goog-api-key`
//! - OpenAI: `GET {endpoint}/v1/models/{model}` with Bearer auth
//! - Ollama: `GET {endpoint}/api/tags` (best-effort model existence check)
//!
//! [`HealthService::check`] never fails: errors are mapped to `ok = false`.
//! The returned [`HealthStatus`] is JSON-serializable for the `/health` route.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{AiLlmError, HealthError, HttpError, make_snippet};

/// A serializable health snapshot for a single provider/config.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Backend/provider (`gemini`, `openai`, `ollama`).
    pub provider: &'static str,
    /// Target endpoint base URL.
    pub endpoint: String,
    /// Model identifier relevant to the probe.
    pub model: String,
    /// Overall health flag.
    pub ok: bool,
    /// Measured HTTP latency in milliseconds for the probe.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

impl HealthStatus {
    fn new(cfg: &LlmModelConfig, ok: bool, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            provider: cfg.provider.as_str(),
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            ok,
            latency_ms,
            message: message.into(),
        }
    }
}

/// Health checker reusing a single HTTP client.
pub struct HealthService {
    client: reqwest::Client,
}

impl HealthService {
    /// Creates a new health service with an optional client timeout (seconds, default 10).
    ///
    /// # Errors
    /// Returns [`AiLlmError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiLlmError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Checks health for `cfg`, routing to the provider-specific probe.
    pub async fn check(&self, cfg: &LlmModelConfig) -> HealthStatus {
        let start = Instant::now();
        let result = match cfg.provider {
            LlmProvider::Gemini => self.try_probe_gemini(cfg).await,
            LlmProvider::OpenAI => self.try_probe_openai(cfg).await,
            LlmProvider::Ollama => self.try_probe_ollama(cfg).await,
        };
        let latency = start.elapsed().as_millis();

        match result {
            Ok(message) => {
                info!(
                    provider = cfg.provider.as_str(),
                    model = %cfg.model,
                    latency_ms = latency,
                    "health probe completed"
                );
                HealthStatus::new(cfg, true, latency, message)
            }
            Err(err) => {
                warn!(
                    provider = cfg.provider.as_str(),
                    model = %cfg.model,
                    latency_ms = latency,
                    error = %err,
                    "health probe failed"
                );
                HealthStatus::new(cfg, false, latency, err.to_string())
            }
        }
    }

    async fn try_probe_gemini(&self, cfg: &LlmModelConfig) -> Result<String, AiLlmError> {
        let key = cfg
            .api_key
            .as_deref()
            .ok_or_else(|| HealthError::Misconfigured("missing Gemini API key".into()))?;
        let url = format!(
            "{}/v1beta/models/{}",
            cfg.endpoint.trim_end_matches('/'),
            cfg.model
        );
        self.get_ok(self.client.get(&url).header("x-goog-api-key", key), &url)
            .await?;
        Ok("Gemini is healthy; model is available".into())
    }

    async fn try_probe_openai(&self, cfg: &LlmModelConfig) -> Result<String, AiLlmError> {
        let key = cfg
            .api_key
            .as_deref()
            .ok_or_else(|| HealthError::Misconfigured("missing OpenAI API key".into()))?;
        let url = format!(
            "{}/v1/models/{}",
            cfg.endpoint.trim_end_matches('/'),
            cfg.model
        );
        self.get_ok(
            self.client
                .get(&url)
                .header(header::AUTHORIZATION, format!("Bearer {key}")),
            &url,
        )
        .await?;
        Ok("OpenAI is healthy; model is available".into())
    }

    async fn try_probe_ollama(&self, cfg: &LlmModelConfig) -> Result<String, AiLlmError> {
        let url = format!("{}/api/tags", cfg.endpoint.trim_end_matches('/'));
        let resp = self.get_ok(self.client.get(&url), &url).await?;

        // Expected minimal JSON: { "models": [ { "name": "<model>" }, ... ] }
        #[derive(Deserialize)]
        struct Tag {
            name: String,
        }
        #[derive(Deserialize)]
        struct Tags {
            models: Option<Vec<Tag>>,
        }

        match resp.json::<Tags>().await {
            Ok(Tags {
                models: Some(models),
            }) if !models.iter().any(|m| m.name == cfg.model) => Err(HealthError::Misconfigured(
                format!("model `{}` not found in /api/tags", cfg.model),
            )
            .into()),
            Ok(_) => Ok("Ollama is healthy".into()),
            Err(e) => Ok(format!("Ollama is reachable; failed to decode /api/tags: {e}")),
        }
    }

    async fn get_ok(
        &self,
        req: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<reqwest::Response, AiLlmError> {
        debug!("GET {}", url);
        let resp = req.send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(HealthError::HttpStatus(HttpError {
                status,
                url: url.to_string(),
                snippet: make_snippet(&text),
            })
            .into());
        }
        Ok(resp)
    }
}
