//! LLM access for the review hook: provider config, Gemini/OpenAI/Ollama
//! clients, health probes and the tracing layer used by the binary.

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod llm_service;
pub mod services;
pub mod telemetry;

pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::AiLlmError;
pub use llm_service::LlmService;
