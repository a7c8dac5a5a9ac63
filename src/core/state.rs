// Application state (AppState)

use crate::core::config::Config;
use crate::services::user_service::UserService;
use crate::stores::repository::UserRepository;
use std::sync::Arc;

/// Shared application state
///
/// Handlers only see the service; the repository behind it is chosen at
/// startup and injected here.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, repo: Arc<dyn UserRepository>) -> Self {
        Self {
            user_service: Arc::new(UserService::new(repo)),
            config: Arc::new(config),
        }
    }
}
