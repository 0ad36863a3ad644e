use std::sync::Arc;

use crate::config::Config;
use crate::llm::LlmProvider;
use crate::services::{ChatService, DocumentScanService, MemberStore};
use crate::vision::VisionProvider;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub chat: ChatService,
    pub scanner: DocumentScanService,
    /// Members retained from the last `/api/update-members` call.
    pub store: MemberStore,
}

impl AppState {
    pub fn new(config: Config, llm: LlmProvider, vision: VisionProvider) -> Self {
        let config = Arc::new(config);
        let store = MemberStore::new();
        let chat = ChatService::new(llm, &config.assistant, store.clone());
        let scanner = DocumentScanService::new(vision, config.expiry);

        Self {
            config,
            chat,
            scanner,
            store,
        }
    }

    /// Whether chat answers come from a language model.
    pub fn llm_enabled(&self) -> bool {
        self.chat.llm_enabled()
    }
}
