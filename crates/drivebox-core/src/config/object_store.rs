//! Object store configuration.

use serde::{Deserialize, Serialize};

/// Object store backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectStoreConfig {
    /// Which backend to use: `"local"` or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Local filesystem backend configuration.
    #[serde(default)]
    pub local: LocalObjectStoreConfig,
}

impl Default for ObjectStoreConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            local: LocalObjectStoreConfig::default(),
        }
    }
}

/// Local filesystem object store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalObjectStoreConfig {
    /// Root path under which all blobs are stored.
    #[serde(default = "default_local_root")]
    pub root_path: String,
}

impl Default for LocalObjectStoreConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_local_root() -> String {
    "data/blobs".to_string()
}
