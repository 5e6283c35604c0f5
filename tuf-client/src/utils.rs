use async_trait::async_trait;
use std::collections::BTreeMap;
use tuf_client_common::storage::TufStorage;
use tuf_client_common::{RoleType, TufError, Version};

#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};
#[cfg(test)]
use tuf_client_common::remote::{TransportError, TufTransport};
#[cfg(test)]
use url::Url;

/// In-memory implementation for TUF storage. Stores the files for the root, timestamp and snapshot roles.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    pub root: Option<Vec<u8>>,
    /// Every root that was persisted under its version.
    pub root_versions: BTreeMap<Version, Vec<u8>>,
    pub timestamp: Option<Vec<u8>>,
    pub snapshot: Option<Vec<u8>>,
}

impl MemoryStorage {
    /// Storage that trusts `root` initially.
    pub fn with_root(root: &[u8]) -> Self {
        MemoryStorage {
            root: Some(root.to_vec()),
            ..Default::default()
        }
    }

    fn slot(&mut self, role: RoleType) -> Result<&mut Option<Vec<u8>>, TufError> {
        match role {
            RoleType::Root => Ok(&mut self.root),
            RoleType::Timestamp => Ok(&mut self.timestamp),
            RoleType::Snapshot => Ok(&mut self.snapshot),
            RoleType::Targets => Err(TufError::Storage(format!(
                "no storage for {role} metadata"
            ))),
        }
    }
}

#[async_trait]
impl TufStorage for MemoryStorage {
    async fn load(&self, role: RoleType) -> Result<Option<Vec<u8>>, TufError> {
        Ok(match role {
            RoleType::Root => self.root.clone(),
            RoleType::Timestamp => self.timestamp.clone(),
            RoleType::Snapshot => self.snapshot.clone(),
            RoleType::Targets => None,
        })
    }

    async fn persist(&mut self, role: RoleType, data: &[u8]) -> Result<(), TufError> {
        *self.slot(role)? = Some(data.to_vec());
        Ok(())
    }

    async fn persist_root_version(&mut self, version: Version, data: &[u8]) -> Result<(), TufError> {
        self.root_versions.insert(version, data.to_vec());
        Ok(())
    }

    async fn delete(&mut self, role: RoleType) -> Result<(), TufError> {
        *self.slot(role)? = None;
        Ok(())
    }
}

/// Transport that serves files from memory, keyed by the last path segment of the requested URL.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockTransport {
    pub files: BTreeMap<String, Vec<u8>>,
    fetches: AtomicUsize,
}

#[cfg(test)]
impl MockTransport {
    pub fn with_file(mut self, name: &str, data: &[u8]) -> Self {
        self.files.insert(name.to_string(), data.to_vec());
        self
    }

    /// Number of fetches served so far, including failed ones.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl TufTransport for MockTransport {
    async fn fetch(&self, url: &Url, max_length: u64) -> Result<Vec<u8>, TransportError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let name = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default();
        let data = self.files.get(name).ok_or(TransportError::NotFound)?;
        if data.len() as u64 > max_length {
            return Err(TransportError::TooLarge { limit: max_length });
        }
        Ok(data.clone())
    }
}
