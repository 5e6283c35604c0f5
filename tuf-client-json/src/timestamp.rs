use crate::{MetaFile, Metadata, SpecVersion};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tuf_client_common::constants::META_SNAPSHOT;
use tuf_client_common::{RoleType, Version};

pub type TimestampMetaFile = MetaFile;

/// JSON encoding of the TUF Timestamp format.
/// [Refer to the TUF specification.](https://theupdateframework.github.io/specification/latest/#file-formats-timestamp)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type", rename = "timestamp")]
pub struct Timestamp {
    pub spec_version: SpecVersion,
    pub version: Version,
    pub expires: DateTime<Utc>,
    /// Only contains the `snapshot.json` entry.
    pub meta: BTreeMap<String, TimestampMetaFile>,
}

impl Timestamp {
    /// The pin of the snapshot file.
    pub fn snapshot_meta(&self) -> Option<&TimestampMetaFile> {
        self.meta.get(META_SNAPSHOT)
    }
}

impl Metadata for Timestamp {
    const ROLE: RoleType = RoleType::Timestamp;

    fn version(&self) -> Version {
        self.version
    }

    fn expires(&self) -> DateTime<Utc> {
        self.expires
    }
}
