use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessageContentPartImageArgs,
        ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContentPart,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs, ImageUrlArgs,
    },
    Client,
};
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::config::{parse_llm_provider_model, provider_needs_api_key, VisionConfig};
use crate::error::{KutumError, Result};
use crate::llm::api::{default_base_url, is_auth_failure, is_rate_limited, single_attempt_client};

/// Used when the upload's bytes don't identify an image type.
const FALLBACK_MIME_TYPE: &str = "image/jpeg";

/// Vision client for any OpenAI-compatible `chat/completions` endpoint that
/// accepts `image_url` parts.
#[derive(Debug, Clone)]
pub struct OpenAiVisionClient {
    client: Client<OpenAIConfig>,
    base_url: String,
    model: String,
    max_tokens: u32,
}

/// MIME type sniffed from the file's magic bytes.
pub fn detect_mime_type(bytes: &[u8]) -> &'static str {
    infer::get(bytes)
        .map(|kind| kind.mime_type())
        .filter(|mime| mime.starts_with("image/"))
        .unwrap_or(FALLBACK_MIME_TYPE)
}

/// `data:<mime>;base64,<payload>` for an inline image part.
fn data_url(image_bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        detect_mime_type(image_bytes),
        STANDARD.encode(image_bytes)
    )
}

impl OpenAiVisionClient {
    pub fn new(config: &VisionConfig) -> Result<Self> {
        let (provider, model) = parse_llm_provider_model(&config.model);

        if provider_needs_api_key(provider) && config.api_key.is_none() {
            return Err(KutumError::Vision(
                "API key required for this vision provider".to_string(),
            ));
        }

        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or_else(|| default_base_url(provider))
            .trim_end_matches('/')
            .to_string();

        let client =
            single_attempt_client(&base_url, config.api_key.as_deref(), config.timeout_secs)
                .map_err(|e| KutumError::Vision(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            model: model.to_string(),
            max_tokens: config.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask the model about one image and return its trimmed reply.
    pub async fn extract(
        &self,
        image_bytes: &[u8],
        system_prompt: &str,
        prompt: &str,
    ) -> Result<String> {
        let request = self.build_request(image_bytes, system_prompt, prompt)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(map_vision_error)?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default().trim().to_string())
            .ok_or_else(|| KutumError::Vision("No response from API".to_string()))
    }

    fn build_request(
        &self,
        image_bytes: &[u8],
        system_prompt: &str,
        prompt: &str,
    ) -> Result<CreateChatCompletionRequest> {
        let text_part = ChatCompletionRequestMessageContentPartTextArgs::default()
            .text(prompt)
            .build()
            .map_err(|e| KutumError::Validation(format!("Invalid vision prompt: {e}")))?;

        let image_url = ImageUrlArgs::default()
            .url(data_url(image_bytes))
            .build()
            .map_err(|e| KutumError::Validation(format!("Invalid image payload: {e}")))?;
        let image_part = ChatCompletionRequestMessageContentPartImageArgs::default()
            .image_url(image_url)
            .build()
            .map_err(|e| KutumError::Validation(format!("Invalid image payload: {e}")))?;

        let parts: Vec<ChatCompletionRequestUserMessageContentPart> =
            vec![text_part.into(), image_part.into()];

        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt)
                .build()
                .map_err(|e| KutumError::Validation(format!("Invalid system prompt: {e}")))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(parts)
                .build()
                .map_err(|e| KutumError::Validation(format!("Invalid vision message: {e}")))?
                .into(),
        ];

        let mut request = CreateChatCompletionRequestArgs::default();
        request
            .model(self.model.clone())
            .messages(messages)
            .max_tokens(self.max_tokens);

        request
            .build()
            .map_err(|e| KutumError::Validation(format!("Invalid vision request: {e}")))
    }
}

fn map_vision_error(error: OpenAIError) -> KutumError {
    if is_rate_limited(&error) {
        return KutumError::Vision(format!("Vision rate limit exceeded: {error}"));
    }
    if is_auth_failure(&error) {
        return KutumError::Vision(format!("Vision authentication failed: {error}"));
    }
    match error {
        OpenAIError::Reqwest(e) => KutumError::Vision(format!("API request failed: {e}")),
        OpenAIError::ApiError(e) => KutumError::Vision(format!("API request failed: {e}")),
        OpenAIError::JSONDeserialize(e) => {
            KutumError::Vision(format!("Failed to parse response: {e}"))
        }
        other => KutumError::Vision(other.to_string()),
    }
}
