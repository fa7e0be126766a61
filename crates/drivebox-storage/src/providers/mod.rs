//! Object store backends.

pub mod local;
pub mod memory;

use std::sync::Arc;

use drivebox_core::config::ObjectStoreConfig;
use drivebox_core::error::AppError;
use drivebox_core::result::AppResult;
use drivebox_core::traits::ObjectStore;

/// Build an object store from configuration.
pub async fn from_config(config: &ObjectStoreConfig) -> AppResult<Arc<dyn ObjectStore>> {
    match config.provider.as_str() {
        "local" => {
            let store = local::LocalObjectStore::new(&config.local.root_path).await?;
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(memory::MemoryObjectStore::new())),
        other => Err(AppError::configuration(format!(
            "Unknown object store provider '{other}'"
        ))),
    }
}
