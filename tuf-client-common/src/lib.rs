pub mod constants;
pub mod crypto;
pub mod error;
pub mod remote;
pub mod storage;

use core::fmt;
use serde::{Deserialize, Serialize};

pub use error::{ErrorKind, TufError};

pub type Version = u64;

/// The top-level roles of a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleType {
    Root,
    Snapshot,
    Targets,
    Timestamp,
}

impl RoleType {
    pub fn name(&self) -> &'static str {
        match self {
            RoleType::Root => "root",
            RoleType::Snapshot => "snapshot",
            RoleType::Targets => "targets",
            RoleType::Timestamp => "timestamp",
        }
    }

    /// Name of the metadata file of this role, without any version prefix.
    pub fn metadata_file_name(&self) -> &'static str {
        match self {
            RoleType::Root => constants::META_ROOT,
            RoleType::Snapshot => constants::META_SNAPSHOT,
            RoleType::Targets => constants::META_TARGETS,
            RoleType::Timestamp => constants::META_TIMESTAMP,
        }
    }
}

impl fmt::Display for RoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod test {
    use crate::RoleType;

    #[test]
    fn test_names() {
        assert_eq!(RoleType::Root.to_string(), "root");
        assert_eq!(RoleType::Snapshot.to_string(), "snapshot");
        assert_eq!(RoleType::Targets.to_string(), "targets");
        assert_eq!(RoleType::Timestamp.to_string(), "timestamp");
        assert_eq!(RoleType::Snapshot.metadata_file_name(), "snapshot.json");
        assert_eq!(RoleType::Timestamp.metadata_file_name(), "timestamp.json");
        assert_ne!(RoleType::Root.name(), RoleType::Targets.name());
    }
}
