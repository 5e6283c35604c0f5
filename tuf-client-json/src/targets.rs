use crate::{Hashes, Key, KeyId, Length, Metadata, SpecVersion};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tuf_client_common::{RoleType, Version};

/// JSON encoding of the TUF targets file format.
/// [Refer to the TUF specification.](https://theupdateframework.github.io/specification/latest/#file-formats-targets)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type", rename = "targets")]
pub struct Targets {
    pub spec_version: SpecVersion,
    /// Version of this targets file.
    pub version: Version,
    pub expires: DateTime<Utc>,
    /// Targets specified in this targets file, keyed by target path.
    pub targets: BTreeMap<String, TargetDescription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegations: Option<Delegations>,
}

/// Information about a target file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetDescription {
    pub length: Length,
    pub hashes: Hashes,
    /// Opaque to the framework.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delegations {
    pub keys: BTreeMap<KeyId, Key>,
    pub roles: Vec<DelegatedRole>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatedRole {
    pub name: String,
    pub keyids: Vec<KeyId>,
    pub threshold: u64,
    #[serde(default)]
    pub terminating: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_hash_prefixes: Option<Vec<String>>,
}

impl Metadata for Targets {
    const ROLE: RoleType = RoleType::Targets;

    fn version(&self) -> Version {
        self.version
    }

    fn expires(&self) -> DateTime<Utc> {
        self.expires
    }
}
