use std::path::PathBuf;

use serde::Deserialize;

/// Blob storage configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory blobs are written under. Default: "./uploads".
    ///
    /// Must never be exposed as a static route.
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,
    /// Maximum accepted blob size in bytes. Default: 128 MiB.
    #[serde(default = "default_max_blob_size")]
    pub max_blob_size: u64,
}

fn default_root_dir() -> PathBuf {
    PathBuf::from("./uploads")
}
fn default_max_blob_size() -> u64 {
    128 * 1024 * 1024
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            max_blob_size: default_max_blob_size(),
        }
    }
}
