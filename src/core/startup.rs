use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::config::{StorageBackend, StorageConfig};
use crate::stores::json_store::JsonFileUserRepository;
use crate::stores::memory_store::MemoryUserRepository;
use crate::stores::repository::UserRepository;

/// Build the repository selected by `[storage]`. Runs once at boot.
pub fn build_repository(config: &StorageConfig) -> Result<Arc<dyn UserRepository>> {
    match config.backend {
        StorageBackend::Json => {
            let repo = JsonFileUserRepository::with_options(&config.path, config.always_reload)
                .context(format!(
                    "Failed to open user store at '{}'",
                    config.path.display()
                ))?;

            info!(
                path = %config.path.display(),
                always_reload = config.always_reload,
                "JSON user store ready"
            );

            Ok(Arc::new(repo))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory user store, users will be lost on shutdown");
            Ok(Arc::new(MemoryUserRepository::new()))
        }
    }
}
