use serde::{Deserialize, Serialize};
use tuf_client_common::constants::{
    DEFAULT_MAX_ROOT_METADATA_FETCHES, DEFAULT_MAX_ROOT_METADATA_SIZE,
    DEFAULT_MAX_SNAPSHOT_METADATA_SIZE, DEFAULT_MAX_TIMESTAMP_METADATA_SIZE,
};

/// Limits applied while updating the trusted metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Upper bound in bytes for a single root file.
    pub max_root_metadata_size: u64,
    /// Upper bound in bytes for the timestamp file.
    pub max_timestamp_metadata_size: u64,
    /// Upper bound in bytes for the snapshot file if the timestamp does not pin its length.
    pub max_snapshot_metadata_size: u64,
    /// Maximum number of root files fetched in a single update.
    pub max_root_metadata_fetches: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            max_root_metadata_size: DEFAULT_MAX_ROOT_METADATA_SIZE,
            max_timestamp_metadata_size: DEFAULT_MAX_TIMESTAMP_METADATA_SIZE,
            max_snapshot_metadata_size: DEFAULT_MAX_SNAPSHOT_METADATA_SIZE,
            max_root_metadata_fetches: DEFAULT_MAX_ROOT_METADATA_FETCHES,
        }
    }
}
