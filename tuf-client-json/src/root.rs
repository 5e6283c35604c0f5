use crate::{Key, KeyId, Metadata, SpecVersion};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tuf_client_common::{RoleType, Version};

/// JSON encoding of a TUF root file.
/// [Refer to the TUF specification.](https://theupdateframework.github.io/specification/latest/#file-formats-root)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type", rename = "root")]
pub struct Root {
    /// Version of the TUF spec.
    pub spec_version: SpecVersion,
    /// Whether snapshot files are addressed with a version prefix.
    pub consistent_snapshot: bool,
    /// Version of the root file.
    pub version: Version,
    pub expires: DateTime<Utc>,
    /// Key registry, keys are referenced by their ID from the roles.
    pub keys: BTreeMap<KeyId, Key>,
    pub roles: RootRoles,
}

/// The top-level roles delegated by the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootRoles {
    pub root: RootRole,
    pub snapshot: RootRole,
    pub targets: RootRole,
    pub timestamp: RootRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirrors: Option<RootRole>,
}

/// A collection of [KeyId]s that specify which keys are associated with a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootRole {
    pub keyids: Vec<KeyId>,
    /// The signature threshold that needs to be reached for validity.
    pub threshold: u64,
}

impl RootRole {
    /// Returns `true` if a key of this role is no longer part of `new`.
    /// Keys that are only added do not count as a rotation.
    pub fn rotated(&self, new: &RootRole) -> bool {
        self.keyids.iter().any(|keyid| !new.keyids.contains(keyid))
    }
}

impl Root {
    pub fn role(&self, role: RoleType) -> &RootRole {
        match role {
            RoleType::Root => &self.roles.root,
            RoleType::Snapshot => &self.roles.snapshot,
            RoleType::Targets => &self.roles.targets,
            RoleType::Timestamp => &self.roles.timestamp,
        }
    }
}

impl Metadata for Root {
    const ROLE: RoleType = RoleType::Root;

    fn version(&self) -> Version {
        self.version
    }

    fn expires(&self) -> DateTime<Utc> {
        self.expires
    }
}
