use serde::Deserialize;
use std::env;

/// Value shipped in the sample `.env`; treated as "no key configured".
const PLACEHOLDER_API_KEY: &str = "your_openai_api_key_here";

const DEFAULT_LLM_MODEL: &str = "openai/gpt-3.5-turbo";
const DEFAULT_VISION_MODEL: &str = "openai/gpt-4o";

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_opt<T: std::str::FromStr>(var: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Ignoring.", val, var, e);
                None
            }
        },
        Err(_) => None,
    }
}

/// First non-empty, non-placeholder key among `vars`.
fn api_key_from(vars: &[&str]) -> Option<String> {
    vars.iter().find_map(|var| {
        env::var(var)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty() && value != PLACEHOLDER_API_KEY)
    })
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: Option<LlmConfig>,
    pub vision: Option<VisionConfig>,
    pub assistant: AssistantConfig,
    pub expiry: ExpiryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

/// Text-completion model used for chat answers.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Vision-capable model used to read expiry dates off document images.
#[derive(Debug, Clone, Deserialize)]
pub struct VisionConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_tokens: u32,
}

/// Retrieval and context truncation limits.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    pub max_ranked_members: usize,
    pub max_context_documents: usize,
    pub max_context_health_records: usize,
    pub max_context_reminders: usize,
}

/// Urgency thresholds for scanned documents, in whole days.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct ExpiryConfig {
    pub high_urgency_days: i64,
    pub reminder_window_days: i64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            max_ranked_members: 5,
            max_context_documents: 10,
            max_context_health_records: 5,
            max_context_reminders: 5,
        }
    }
}

impl Default for ExpiryConfig {
    fn default() -> Self {
        Self {
            high_urgency_days: 30,
            reminder_window_days: 90,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: parse_origins("http://localhost:5173,http://localhost:3000"),
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let server_defaults = ServerConfig::default();
        let assistant_defaults = AssistantConfig::default();
        let expiry_defaults = ExpiryConfig::default();

        let llm_api_key = api_key_from(&["LLM_API_KEY", "OPENAI_API_KEY"]);
        let llm_model = env::var("LLM_MODEL").ok();
        let vision_api_key = api_key_from(&["VISION_API_KEY", "LLM_API_KEY", "OPENAI_API_KEY"]);
        let vision_model = env::var("VISION_MODEL").ok();

        Self {
            server: ServerConfig {
                host: env::var("KUTUM_HOST").unwrap_or(server_defaults.host),
                port: parse_env_or("KUTUM_PORT", server_defaults.port),
                cors_origins: env::var("KUTUM_CORS_ORIGINS")
                    .map(|raw| parse_origins(&raw))
                    .unwrap_or(server_defaults.cors_origins),
                max_upload_bytes: parse_env_or(
                    "KUTUM_MAX_UPLOAD_BYTES",
                    server_defaults.max_upload_bytes,
                ),
            },
            llm: if llm_model.is_some() || llm_api_key.is_some() {
                Some(LlmConfig {
                    model: llm_model.unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
                    api_key: llm_api_key,
                    base_url: env::var("LLM_BASE_URL").ok(),
                    timeout_secs: parse_env_or("LLM_TIMEOUT", 30),
                    temperature: parse_env_or("LLM_TEMPERATURE", 0.7),
                    max_tokens: parse_env_or("LLM_MAX_TOKENS", 400),
                })
            } else {
                None
            },
            vision: if vision_model.is_some() || vision_api_key.is_some() {
                Some(VisionConfig {
                    model: vision_model.unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string()),
                    api_key: vision_api_key,
                    base_url: env::var("VISION_BASE_URL").ok(),
                    timeout_secs: parse_env_or("VISION_TIMEOUT", 30),
                    max_tokens: parse_env_or("VISION_MAX_TOKENS", 100),
                })
            } else {
                None
            },
            assistant: AssistantConfig {
                max_ranked_members: parse_env_or(
                    "RETRIEVAL_MAX_MEMBERS",
                    assistant_defaults.max_ranked_members,
                ),
                max_context_documents: parse_env_or(
                    "CONTEXT_MAX_DOCUMENTS",
                    assistant_defaults.max_context_documents,
                ),
                max_context_health_records: parse_env_or(
                    "CONTEXT_MAX_HEALTH_RECORDS",
                    assistant_defaults.max_context_health_records,
                ),
                max_context_reminders: parse_env_or(
                    "CONTEXT_MAX_REMINDERS",
                    assistant_defaults.max_context_reminders,
                ),
            },
            expiry: ExpiryConfig {
                high_urgency_days: parse_env_opt("EXPIRY_HIGH_URGENCY_DAYS")
                    .unwrap_or(expiry_defaults.high_urgency_days),
                reminder_window_days: parse_env_opt("EXPIRY_REMINDER_WINDOW_DAYS")
                    .unwrap_or(expiry_defaults.reminder_window_days),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Known LLM providers that use OpenAI-compatible APIs
pub const KNOWN_LLM_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "lmstudio"];

/// Parse an LLM model name into (provider, model) tuple.
pub fn parse_llm_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_LLM_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    // Default to treating the whole string as a local model
    ("local", model)
}

/// Whether a provider prefix is served without credentials.
pub fn provider_needs_api_key(provider: &str) -> bool {
    !matches!(
        provider.to_lowercase().as_str(),
        "ollama" | "local" | "lmstudio"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEY_VARS: &[&str] = &[
        "LLM_MODEL",
        "LLM_API_KEY",
        "OPENAI_API_KEY",
        "VISION_MODEL",
        "VISION_API_KEY",
    ];

    fn clear_key_vars() {
        for var in KEY_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_no_keys_disables_external_models() {
        clear_key_vars();

        let config = Config::default();
        assert!(config.llm.is_none());
        assert!(config.vision.is_none());
    }

    #[test]
    #[serial]
    fn test_openai_key_enables_both_models_with_defaults() {
        clear_key_vars();
        env::set_var("OPENAI_API_KEY", "sk-test");

        let config = Config::default();
        let llm = config.llm.expect("llm config");
        assert_eq!(llm.model, DEFAULT_LLM_MODEL);
        assert_eq!(llm.api_key.as_deref(), Some("sk-test"));
        assert_eq!(llm.timeout_secs, 30);
        assert_eq!(llm.max_tokens, 400);
        assert!((llm.temperature - 0.7).abs() < f32::EPSILON);

        let vision = config.vision.expect("vision config");
        assert_eq!(vision.model, DEFAULT_VISION_MODEL);
        assert_eq!(vision.api_key.as_deref(), Some("sk-test"));
        assert_eq!(vision.max_tokens, 100);

        clear_key_vars();
    }

    #[test]
    #[serial]
    fn test_placeholder_key_is_ignored() {
        clear_key_vars();
        env::set_var("OPENAI_API_KEY", PLACEHOLDER_API_KEY);

        let config = Config::default();
        assert!(config.llm.is_none());
        assert!(config.vision.is_none());

        clear_key_vars();
    }

    #[test]
    #[serial]
    fn test_keyless_local_model() {
        clear_key_vars();
        env::set_var("LLM_MODEL", "ollama/llama3.2");

        let config = Config::default();
        let llm = config.llm.expect("llm config");
        assert_eq!(llm.model, "ollama/llama3.2");
        assert!(llm.api_key.is_none());
        assert!(config.vision.is_none());

        clear_key_vars();
    }

    #[test]
    #[serial]
    fn test_policy_defaults() {
        env::remove_var("RETRIEVAL_MAX_MEMBERS");
        env::remove_var("EXPIRY_REMINDER_WINDOW_DAYS");

        let config = Config::default();
        assert_eq!(config.assistant.max_ranked_members, 5);
        assert_eq!(config.assistant.max_context_documents, 10);
        assert_eq!(config.assistant.max_context_health_records, 5);
        assert_eq!(config.assistant.max_context_reminders, 5);
        assert_eq!(config.expiry, ExpiryConfig::default());
    }

    #[test]
    #[serial]
    fn test_invalid_port_falls_back_to_default() {
        env::set_var("KUTUM_PORT", "not-a-port");
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        env::remove_var("KUTUM_PORT");
    }

    #[test]
    #[serial]
    fn test_cors_origins_from_env() {
        env::set_var("KUTUM_CORS_ORIGINS", "https://a.example, ,https://b.example");
        let config = Config::default();
        assert_eq!(
            config.server.cors_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        env::remove_var("KUTUM_CORS_ORIGINS");
    }

    #[test]
    fn test_parse_llm_provider_model() {
        assert_eq!(parse_llm_provider_model("openai/gpt-4o"), ("openai", "gpt-4o"));
        assert_eq!(
            parse_llm_provider_model("openrouter/anthropic/claude-3.5-sonnet"),
            ("openrouter", "anthropic/claude-3.5-sonnet")
        );
        assert_eq!(
            parse_llm_provider_model("unknown/model-name"),
            ("local", "unknown/model-name")
        );
    }

    #[test]
    fn test_provider_needs_api_key() {
        assert!(provider_needs_api_key("openai"));
        assert!(provider_needs_api_key("OpenRouter"));
        assert!(!provider_needs_api_key("ollama"));
        assert!(!provider_needs_api_key("local"));
    }
}
