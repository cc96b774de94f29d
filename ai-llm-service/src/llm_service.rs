//! Shared LLM service used by the review pipeline.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - The provider client is built lazily on the first call and then reused.
//!   A client that fails to build (e.g. missing API key) is not cached, so the
//!   error is reported on every call.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::{config::default_config::config_from_vars, llm_service::LlmService};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = config_from_vars(&|name: &str| std::env::var(name).ok())?;
//! let svc = Arc::new(LlmService::new(cfg)?);
//! let review = svc.generate("Review this diff: ...", None).await?;
//! println!("{review}");
//! # Ok(()) }
//! ```

use tokio::sync::OnceCell;
use tracing::debug;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    health_service::{HealthService, HealthStatus},
    services::{
        gemini_service::GeminiService, ollama_service::OllamaService,
        open_ai_service::OpenAiService,
    },
};

/// Concrete provider client with enum dispatch.
enum ProviderClient {
    Gemini(GeminiService),
    Ollama(OllamaService),
    OpenAI(OpenAiService),
}

impl ProviderClient {
    fn from_config(cfg: &LlmModelConfig) -> Result<Self, AiLlmError> {
        Ok(match cfg.provider {
            LlmProvider::Gemini => ProviderClient::Gemini(GeminiService::new(cfg.clone())?),
            LlmProvider::Ollama => ProviderClient::Ollama(OllamaService::new(cfg.clone())?),
            LlmProvider::OpenAI => ProviderClient::OpenAI(OpenAiService::new(cfg.clone())?),
        })
    }

    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, AiLlmError> {
        match self {
            ProviderClient::Gemini(c) => c.generate(prompt, system).await,
            ProviderClient::Ollama(c) => c.generate(prompt, system).await,
            ProviderClient::OpenAI(c) => c.generate(prompt, system).await,
        }
    }
}

/// Text-generation facade over the configured provider.
pub struct LlmService {
    cfg: LlmModelConfig,
    client: OnceCell<ProviderClient>,
    health: HealthService,
}

impl LlmService {
    /// Creates the service. Provider clients are not built until first use.
    ///
    /// # Errors
    /// Returns [`AiLlmError::HttpTransport`] if the health-check client cannot be built.
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        Ok(Self {
            cfg,
            client: OnceCell::new(),
            health: HealthService::new(Some(10))?,
        })
    }

    /// Generates a completion for `prompt`.
    ///
    /// An empty completion is returned as `Ok(String::new())`.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if the client cannot be built or the call fails.
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, AiLlmError> {
        let client = self
            .client
            .get_or_try_init(|| async {
                debug!(provider = self.cfg.provider.as_str(), "initializing LLM client");
                ProviderClient::from_config(&self.cfg)
            })
            .await?;
        client.generate(prompt, system).await
    }

    /// Best-effort health probe of the configured provider.
    pub async fn health(&self) -> HealthStatus {
        self.health.check(&self.cfg).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handler::{ProviderError, ProviderErrorKind};

    fn gemini(endpoint: String, api_key: Option<&str>) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Gemini,
            model: "gemini-1.5-flash".into(),
            endpoint,
            api_key: api_key.map(str::to_string),
            max_tokens: None,
            temperature: Some(0.2),
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[tokio::test]
    async fn missing_key_fails_every_call() {
        let svc = LlmService::new(gemini("https://example.invalid".into(), None)).unwrap();
        for _ in 0..2 {
            let err = svc.generate("p", None).await.unwrap_err();
            assert!(matches!(
                err,
                AiLlmError::Provider(ProviderError {
                    kind: ProviderErrorKind::MissingApiKey,
                    ..
                })
            ));
        }
    }

    #[tokio::test]
    async fn dispatches_to_configured_provider() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"fine"}]}}]}"#)
            .expect(2)
            .create_async()
            .await;

        let svc = LlmService::new(gemini(server.url(), Some("k"))).unwrap();
        assert_eq!(svc.generate("a", None).await.unwrap(), "fine");
        assert_eq!(svc.generate("b", None).await.unwrap(), "fine");
        mock.assert_async().await;
    }
}
