use crate::{RoleType, TufError, Version};
use async_trait::async_trait;

/// A trait to abstract file storage for trusted metadata.
///
/// The storage is owned by a single client, concurrent writers are not supported.
#[async_trait]
pub trait TufStorage: Send + Sync {
    /// Load the currently stored metadata of `role`, `None` if there is none.
    async fn load(&self, role: RoleType) -> Result<Option<Vec<u8>>, TufError>;
    /// Persistently store `data` as the current metadata of `role`, replacing the previous file.
    async fn persist(&mut self, role: RoleType, data: &[u8]) -> Result<(), TufError>;
    /// Persistently store a root file under its explicit version, kept as the history of the chain.
    async fn persist_root_version(&mut self, version: Version, data: &[u8]) -> Result<(), TufError>;
    /// Delete the currently stored metadata of `role`. Deleting missing metadata is not an error.
    async fn delete(&mut self, role: RoleType) -> Result<(), TufError>;
}
