use crate::config::AppConfig;
use crate::services::JournalService;
use std::sync::Arc;

#[derive(Debug)]
pub struct AppState {
    pub config: AppConfig,
    pub journal: Arc<JournalService>,
}
