use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use crate::config::ExpiryConfig;
use crate::expiry::{interpret, ExpiryExtraction};
use crate::llm::prompts::{EXPIRY_SYSTEM_PROMPT, EXPIRY_USER_PROMPT};
use crate::vision::VisionProvider;

/// Reads expiry dates off uploaded document images.
#[derive(Debug, Clone)]
pub struct DocumentScanService {
    vision: VisionProvider,
    config: ExpiryConfig,
}

impl DocumentScanService {
    pub fn new(vision: VisionProvider, config: ExpiryConfig) -> Self {
        Self { vision, config }
    }

    pub fn vision_enabled(&self) -> bool {
        self.vision.is_available()
    }

    /// Scan relative to the local wall clock.
    pub async fn scan(&self, image_bytes: &[u8], document_type: Option<&str>) -> ExpiryExtraction {
        self.scan_at(image_bytes, document_type, Local::now().naive_local())
            .await
    }

    /// Never fails: a model error becomes [`ExpiryExtraction::Failed`].
    pub async fn scan_at(
        &self,
        image_bytes: &[u8],
        document_type: Option<&str>,
        now: NaiveDateTime,
    ) -> ExpiryExtraction {
        let raw = match self
            .vision
            .extract(image_bytes, EXPIRY_SYSTEM_PROMPT, EXPIRY_USER_PROMPT)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, document_type, "Expiry extraction failed");
                return ExpiryExtraction::Failed {
                    error: e.to_string(),
                };
            }
        };

        let extraction = interpret(&raw, now, &self.config);
        info!(
            document_type,
            bytes = image_bytes.len(),
            found = extraction.found(),
            "Scanned document for expiry date"
        );
        extraction
    }
}
