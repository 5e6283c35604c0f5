use crate::{MetaFile, Metadata, SpecVersion};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tuf_client_common::{RoleType, Version};

pub type SnapshotMetaFile = MetaFile;

/// JSON encoding of a TUF snapshot file.
/// [Refer to the TUF specification.](https://theupdateframework.github.io/specification/latest/#file-formats-snapshot)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type", rename = "snapshot")]
pub struct Snapshot {
    pub spec_version: SpecVersion,
    pub version: Version,
    pub expires: DateTime<Utc>,
    /// Maps the metadata file name, e.g. `targets.json`, to its pin.
    pub meta: BTreeMap<String, SnapshotMetaFile>,
}

impl Metadata for Snapshot {
    const ROLE: RoleType = RoleType::Snapshot;

    fn version(&self) -> Version {
        self.version
    }

    fn expires(&self) -> DateTime<Utc> {
        self.expires
    }
}
