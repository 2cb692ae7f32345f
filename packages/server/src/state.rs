use std::sync::Arc;

use crate::config::AppConfig;
use crate::coordinator::DocumentCoordinator;

#[derive(Clone)]
pub struct AppState {
    pub documents: Arc<DocumentCoordinator>,
    pub config: AppConfig,
}
