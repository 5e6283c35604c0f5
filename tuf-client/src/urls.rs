use tuf_client_common::constants::{META_SNAPSHOT, META_TIMESTAMP};
use tuf_client_common::{TufError, Version};
use tuf_client_json::root::Root;
use url::Url;

/// Resolves the location of metadata files in a repository.
pub trait UrlBuilder: Send + Sync {
    /// Location of the root file with the given version.
    fn root_url(&self, version: Version) -> Result<Url, TufError>;
    /// Location of the timestamp file, its version is never known in advance.
    fn timestamp_url(&self) -> Result<Url, TufError>;
    /// Location of the snapshot file pinned to `version` by the timestamp.
    fn snapshot_url(&self, root: &Root, version: Version) -> Result<Url, TufError>;
}

/// Flat repository layout below a base URL, e.g. `https://example.com/metadata/2.root.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryUrls {
    base: Url,
}

impl RepositoryUrls {
    pub fn new(mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        RepositoryUrls { base }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn join(&self, file: &str) -> Result<Url, TufError> {
        self.base
            .join(file)
            .map_err(|err| TufError::InvalidUrl(err.to_string()))
    }
}

impl UrlBuilder for RepositoryUrls {
    fn root_url(&self, version: Version) -> Result<Url, TufError> {
        self.join(&format!("{version}.root.json"))
    }

    fn timestamp_url(&self) -> Result<Url, TufError> {
        self.join(META_TIMESTAMP)
    }

    fn snapshot_url(&self, root: &Root, version: Version) -> Result<Url, TufError> {
        if root.consistent_snapshot {
            self.join(&format!("{version}.{META_SNAPSHOT}"))
        } else {
            self.join(META_SNAPSHOT)
        }
    }
}
