use std::time::Duration;

use tracing::{info, warn};

use crate::config::VisionConfig;
use crate::error::{KutumError, Result};

use super::api::OpenAiVisionClient;

#[derive(Clone)]
enum VisionBackend {
    Api { client: OpenAiVisionClient },
    Unavailable { reason: String },
}

#[derive(Clone)]
pub struct VisionProvider {
    backend: VisionBackend,
    timeout_secs: u64,
}

impl VisionProvider {
    pub fn new(config: Option<&VisionConfig>) -> Self {
        let Some(config) = config else {
            return Self::unavailable("No vision model configured");
        };

        let backend = match OpenAiVisionClient::new(config) {
            Ok(client) => {
                info!(model = %config.model, "Vision backend initialized");
                VisionBackend::Api { client }
            }
            Err(e) => {
                let reason = format!("Vision backend unavailable: {e}");
                warn!("{}", reason);
                VisionBackend::Unavailable { reason }
            }
        };

        Self {
            backend,
            timeout_secs: config.timeout_secs,
        }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            backend: VisionBackend::Unavailable {
                reason: reason.to_string(),
            },
            timeout_secs: 0,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, VisionBackend::Unavailable { .. })
    }

    /// One question about one image, bounded by the configured timeout.
    pub async fn extract(
        &self,
        image_bytes: &[u8],
        system_prompt: &str,
        prompt: &str,
    ) -> Result<String> {
        let client = match &self.backend {
            VisionBackend::Api { client } => client,
            VisionBackend::Unavailable { reason } => {
                return Err(KutumError::VisionUnavailable(reason.clone()))
            }
        };

        let timeout_duration = Duration::from_secs(self.timeout_secs);
        let request = client.extract(image_bytes, system_prompt, prompt);
        match tokio::time::timeout(timeout_duration, request).await {
            Ok(inner_result) => inner_result,
            Err(_) => Err(KutumError::Vision(format!(
                "Vision request timed out after {} seconds",
                self.timeout_secs
            ))),
        }
    }
}

impl std::fmt::Debug for VisionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backend = match &self.backend {
            VisionBackend::Api { client } => format!("api({})", client.model()),
            VisionBackend::Unavailable { reason } => format!("unavailable({reason})"),
        };
        f.debug_struct("VisionProvider")
            .field("backend", &backend)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
