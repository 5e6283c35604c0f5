use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tuf_client::ClientConfig;
use url::Url;

/// Data structure to parse/store configurations
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// base URL of the metadata, `file://` URLs are read from disk
    pub repository: Url,
    /// directory that holds the trusted metadata
    pub storage: PathBuf,
    /// root distributed out of band, only used if the storage does not hold a root yet
    #[serde(default)]
    pub bootstrap_root: Option<PathBuf>,
    #[serde(default)]
    pub client: ClientConfig,
}
