use std::sync::Arc;

use crate::config::ServerConfig;
use crate::submission_store::SubmissionStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SubmissionStore>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            store: Arc::new(SubmissionStore::new(&config.storage.csv_path)),
            config: Arc::new(config),
        }
    }
}
