use std::sync::Arc;

use crate::config::ServerConfig;
use crate::storage::MediaStore;

/// Handle passed to every handler through `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub pool: musicrev_db::DbPool,
    /// Audio storage rooted at `config.media_root`.
    pub media: MediaStore,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(pool: musicrev_db::DbPool, config: ServerConfig) -> Self {
        Self {
            pool,
            media: MediaStore::new(config.media_root.clone()),
            config: Arc::new(config),
        }
    }
}
