use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use tuf_client::storage::TufStorage;
use tuf_client::{common::RoleType, common::Version, TufError};

/// Stores the trusted metadata as `<dir>/<role>.json`, every root also as `<dir>/<version>.root.json`.
#[derive(Debug, Clone)]
pub struct FilesystemStorage {
    dir: PathBuf,
}

fn storage_error(path: &Path, err: std::io::Error) -> TufError {
    TufError::Storage(format!("{}: {err}", path.display()))
}

impl FilesystemStorage {
    /// Opens the storage in `dir`, the directory is created if it does not exist.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, TufError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|err| storage_error(&dir, err))?;
        Ok(FilesystemStorage { dir })
    }

    fn path(&self, role: RoleType) -> PathBuf {
        self.dir.join(role.metadata_file_name())
    }

    /// Replace the file at `path`, readers never observe a partially written file.
    async fn write(&self, path: &Path, data: &[u8]) -> Result<(), TufError> {
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, data)
            .await
            .map_err(|err| storage_error(&tmp, err))?;
        fs::rename(&tmp, path)
            .await
            .map_err(|err| storage_error(path, err))?;
        debug!(path = %path.display(), "persisted metadata");
        Ok(())
    }
}

#[async_trait]
impl TufStorage for FilesystemStorage {
    async fn load(&self, role: RoleType) -> Result<Option<Vec<u8>>, TufError> {
        let path = self.path(role);
        match fs::read(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(storage_error(&path, err)),
        }
    }

    async fn persist(&mut self, role: RoleType, data: &[u8]) -> Result<(), TufError> {
        let path = self.path(role);
        self.write(&path, data).await
    }

    async fn persist_root_version(&mut self, version: Version, data: &[u8]) -> Result<(), TufError> {
        let path = self.dir.join(format!("{version}.root.json"));
        self.write(&path, data).await
    }

    async fn delete(&mut self, role: RoleType) -> Result<(), TufError> {
        let path = self.path(role);
        match fs::remove_file(&path).await {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(storage_error(&path, err)),
            _ => Ok(()),
        }
    }
}
