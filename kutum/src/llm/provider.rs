use std::sync::Arc;
use std::time::Duration;

use crate::config::{parse_llm_provider_model, LlmConfig};
use crate::error::{KutumError, Result};
use crate::llm::api::LlmApiClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmBackend {
    OpenAI,
    OpenRouter,
    Ollama,
    LmStudio,
    OpenAICompatible { base_url: String },
    Unavailable { reason: String },
}

#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl CompletionOptions {
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            temperature: Some(config.temperature),
            max_tokens: Some(config.max_tokens),
        }
    }
}

/// The text model behind chat answers, or the reason there isn't one.
#[derive(Clone)]
pub struct LlmProvider {
    backend: LlmBackend,
    config: Option<Arc<LlmConfig>>,
    client: Option<LlmApiClient>,
}

impl LlmProvider {
    pub fn new(config: Option<&LlmConfig>) -> Self {
        let Some(config) = config else {
            return Self::unavailable("No LLM configuration provided");
        };

        let (provider, _model) = parse_llm_provider_model(&config.model);

        let backend = match provider.to_lowercase().as_str() {
            "openai" => LlmBackend::OpenAI,
            "openrouter" => LlmBackend::OpenRouter,
            "ollama" => LlmBackend::Ollama,
            "lmstudio" => LlmBackend::LmStudio,
            _ => {
                if let Some(base_url) = &config.base_url {
                    LlmBackend::OpenAICompatible {
                        base_url: base_url.clone(),
                    }
                } else {
                    LlmBackend::Unavailable {
                        reason: format!("Unknown provider in model: {}", config.model),
                    }
                }
            }
        };

        if let LlmBackend::Unavailable { reason } = &backend {
            tracing::warn!("{}", reason);
            return Self::unavailable(reason);
        }

        match LlmApiClient::new(config) {
            Ok(client) => {
                tracing::info!(model = %config.model, "LLM backend initialized");
                Self {
                    backend,
                    config: Some(Arc::new(config.clone())),
                    client: Some(client),
                }
            }
            Err(e) => {
                let reason = format!("LLM backend unavailable: {e}");
                tracing::warn!("{}", reason);
                Self::unavailable(&reason)
            }
        }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            backend: LlmBackend::Unavailable {
                reason: reason.to_string(),
            },
            config: None,
            client: None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, LlmBackend::Unavailable { .. })
    }

    pub fn backend(&self) -> &LlmBackend {
        &self.backend
    }

    pub fn config(&self) -> Option<&LlmConfig> {
        self.config.as_deref()
    }

    /// Complete `prompt` under `system_prompt`, bounded by the configured
    /// timeout. Options not given fall back to the configured temperature
    /// and token limit.
    pub async fn complete(
        &self,
        system_prompt: &str,
        prompt: &str,
        options: Option<&CompletionOptions>,
    ) -> Result<String> {
        let (Some(client), Some(config)) = (&self.client, self.config()) else {
            return Err(KutumError::LlmUnavailable(self.unavailable_reason()));
        };

        let defaults = CompletionOptions::from_config(config);
        let options = options.unwrap_or(&defaults);
        let timeout = Duration::from_secs(config.timeout_secs);

        let request = client.complete(prompt, Some(system_prompt), Some(options));
        match tokio::time::timeout(timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(KutumError::Llm(format!(
                "LLM completion timed out after {} seconds",
                config.timeout_secs
            ))),
        }
    }

    fn unavailable_reason(&self) -> String {
        match &self.backend {
            LlmBackend::Unavailable { reason } => reason.clone(),
            _ => "LLM client not initialized".to_string(),
        }
    }
}

impl std::fmt::Debug for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmProvider")
            .field("backend", &self.backend)
            .field("model", &self.config.as_ref().map(|c| c.model.as_str()))
            .finish()
    }
}
