use std::sync::Arc;

use tutor_db::Store;
use tutor_llm::LlmGateway;

use crate::config::ServerConfig;
use crate::services::characters::CharacterService;
use crate::services::chat::ChatService;
use crate::services::lessons::LessonAdminService;
use crate::services::progress::ProgressService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Document store backing every service.
    pub store: Arc<dyn Store>,
    /// Server configuration (admin key, timeouts).
    pub config: Arc<ServerConfig>,
    pub characters: Arc<CharacterService>,
    pub chat: Arc<ChatService>,
    pub lessons: Arc<LessonAdminService>,
    pub progress: Arc<ProgressService>,
}

impl AppState {
    /// Wire the services over one store and one gateway.
    pub fn new(config: ServerConfig, store: Arc<dyn Store>, gateway: Arc<dyn LlmGateway>) -> Self {
        let chat = ChatService::new(Arc::clone(&store), gateway, config.gateway_timeout());
        Self {
            characters: Arc::new(CharacterService::new(Arc::clone(&store))),
            chat: Arc::new(chat),
            lessons: Arc::new(LessonAdminService::new(Arc::clone(&store))),
            progress: Arc::new(ProgressService::new(Arc::clone(&store))),
            store,
            config: Arc::new(config),
        }
    }
}
