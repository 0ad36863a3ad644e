use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::{ApiError, OpenAIError},
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    },
    Client,
};

use crate::{
    config::{parse_llm_provider_model, provider_needs_api_key, LlmConfig},
    error::{KutumError, Result},
    llm::provider::CompletionOptions,
};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";
const LMSTUDIO_BASE_URL: &str = "http://localhost:1234/v1";

#[derive(Debug, Clone)]
struct ApiConfig {
    base_url: String,
    api_key: Option<String>,
    model: String,
    timeout_secs: u64,
}

/// Chat-completion client for any OpenAI-compatible endpoint.
///
/// Each call is a single attempt: a failed answer is recovered by the
/// rule-based responder, so waiting on retries only delays the user.
#[derive(Clone)]
pub struct LlmApiClient {
    client: Client<OpenAIConfig>,
    config: ApiConfig,
}

impl LlmApiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_config = ApiConfig::from_llm_config(config);

        let (provider, _) = parse_llm_provider_model(&config.model);
        if provider_needs_api_key(provider) && api_config.api_key.is_none() {
            return Err(KutumError::Llm(
                "API key required for this provider".to_string(),
            ));
        }

        let client = single_attempt_client(
            &api_config.base_url,
            api_config.api_key.as_deref(),
            api_config.timeout_secs,
        )
        .map_err(|error| {
            KutumError::Llm(format!("Failed to create LLM HTTP client: {error}"))
        })?;

        Ok(Self {
            client,
            config: api_config,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Send one system + user exchange and return the trimmed reply.
    pub async fn complete(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        options: Option<&CompletionOptions>,
    ) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(KutumError::Validation("Prompt cannot be empty".to_string()));
        }

        let request = self.build_request(prompt, system_prompt, options)?;

        match self.client.chat().create(request).await {
            Ok(response) => Self::extract_content(response),
            Err(error) => {
                if let Some(rate_limit_error) = Self::rate_limit_error(&error) {
                    return Err(rate_limit_error);
                }
                if let Some(auth_error) = Self::auth_error(&error) {
                    return Err(auth_error);
                }
                Err(Self::map_openai_error(error))
            }
        }
    }

    fn build_request(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        options: Option<&CompletionOptions>,
    ) -> Result<CreateChatCompletionRequest> {
        let mut messages = Vec::new();

        if let Some(system_prompt) = system_prompt.filter(|value| !value.trim().is_empty()) {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt)
                    .build()
                    .map_err(|error| {
                        KutumError::Validation(format!("Invalid system prompt: {error}"))
                    })?
                    .into(),
            );
        }

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|error| KutumError::Validation(format!("Invalid user prompt: {error}")))?
                .into(),
        );

        let mut request = CreateChatCompletionRequestArgs::default();
        request.model(self.config.model.clone()).messages(messages);
        Self::apply_completion_options(&mut request, options);

        request.build().map_err(|error| {
            KutumError::Validation(format!("Invalid LLM completion request: {error}"))
        })
    }

    fn apply_completion_options(
        request: &mut CreateChatCompletionRequestArgs,
        options: Option<&CompletionOptions>,
    ) {
        let Some(options) = options else {
            return;
        };

        if let Some(temperature) = options.temperature {
            request.temperature(temperature);
        }

        if let Some(max_tokens) = options.max_tokens {
            request.max_tokens(max_tokens);
        }
    }

    fn extract_content(response: CreateChatCompletionResponse) -> Result<String> {
        let message = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| KutumError::Llm("LLM response contained no choices".to_string()))?
            .message
            .content
            .unwrap_or_default();

        let message = message.trim();
        if message.is_empty() {
            return Err(KutumError::Llm(
                "LLM response contained empty content".to_string(),
            ));
        }

        Ok(message.to_string())
    }

    fn rate_limit_error(error: &OpenAIError) -> Option<KutumError> {
        is_rate_limited(error).then_some(KutumError::LlmRateLimit { retry_after: None })
    }

    fn auth_error(error: &OpenAIError) -> Option<KutumError> {
        is_auth_failure(error)
            .then(|| KutumError::Llm(format!("LLM authentication failed: {error}")))
    }

    fn map_openai_error(error: OpenAIError) -> KutumError {
        match error {
            OpenAIError::Reqwest(reqwest_error) => {
                KutumError::Llm(format!("LLM request failed: {reqwest_error}"))
            }
            OpenAIError::ApiError(api_error) => {
                KutumError::Llm(format!("LLM API error: {api_error}"))
            }
            OpenAIError::JSONDeserialize(err) => {
                KutumError::Llm(format!("Failed to parse LLM response: {err}"))
            }
            OpenAIError::InvalidArgument(message) => KutumError::Validation(message),
            other => KutumError::Llm(other.to_string()),
        }
    }
}

impl ApiConfig {
    fn from_llm_config(config: &LlmConfig) -> Self {
        let (provider, model) = parse_llm_provider_model(&config.model);

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| default_base_url(provider).to_string());

        Self {
            base_url,
            api_key: config.api_key.clone(),
            model: model.to_string(),
            timeout_secs: config.timeout_secs,
        }
    }
}

/// async-openai client for one OpenAI-compatible endpoint. Every call on it
/// is a single attempt bounded by `timeout_secs`.
pub(crate) fn single_attempt_client(
    base_url: &str,
    api_key: Option<&str>,
    timeout_secs: u64,
) -> std::result::Result<Client<OpenAIConfig>, reqwest::Error> {
    let openai_config = OpenAIConfig::new()
        .with_api_base(base_url)
        .with_api_key(api_key.unwrap_or_default());

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;

    // async-openai retries rate-limited and 5xx calls on its own; a zero
    // budget turns that off.
    let backoff = backoff::ExponentialBackoff {
        max_elapsed_time: Some(Duration::ZERO),
        ..Default::default()
    };

    Ok(Client::with_config(openai_config)
        .with_http_client(http_client)
        .with_backoff(backoff))
}

/// 429 responses and quota exhaustion.
pub(crate) fn is_rate_limited(error: &OpenAIError) -> bool {
    match error {
        OpenAIError::Reqwest(reqwest_error) => {
            reqwest_error.status() == Some(reqwest::StatusCode::TOO_MANY_REQUESTS)
        }
        OpenAIError::ApiError(api_error) => is_rate_limit_api_error(api_error),
        _ => false,
    }
}

/// Rejected or missing credentials.
pub(crate) fn is_auth_failure(error: &OpenAIError) -> bool {
    match error {
        OpenAIError::Reqwest(reqwest_error) => matches!(
            reqwest_error.status(),
            Some(reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN)
        ),
        OpenAIError::ApiError(api_error) => is_auth_api_error(api_error),
        _ => false,
    }
}

fn is_rate_limit_api_error(api_error: &ApiError) -> bool {
    let message = api_error.message.to_lowercase();
    let error_type = api_error.r#type.clone().unwrap_or_default().to_lowercase();
    let code = api_error.code.clone().unwrap_or_default().to_lowercase();

    message.contains("rate limit")
        || message.contains("too many requests")
        || error_type.contains("rate_limit")
        || code.contains("rate_limit")
        || code == "insufficient_quota"
}

fn is_auth_api_error(api_error: &ApiError) -> bool {
    let message = api_error.message.to_lowercase();
    let error_type = api_error.r#type.clone().unwrap_or_default().to_lowercase();
    let code = api_error.code.clone().unwrap_or_default().to_lowercase();

    message.contains("unauthorized")
        || message.contains("invalid api key")
        || message.contains("incorrect api key")
        || code.contains("invalid_api_key")
        || error_type.contains("authentication")
}

pub(crate) fn default_base_url(provider: &str) -> &'static str {
    match provider.to_lowercase().as_str() {
        "openrouter" => OPENROUTER_BASE_URL,
        "ollama" => OLLAMA_BASE_URL,
        "lmstudio" => LMSTUDIO_BASE_URL,
        _ => OPENAI_BASE_URL,
    }
}
