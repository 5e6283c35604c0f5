use crate::SpecVersion;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tuf_client_common::Version;

/// JSON encoding of the TUF mirrors file, it is not interpreted by this client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type", rename = "mirrors")]
pub struct Mirrors {
    pub spec_version: SpecVersion,
    pub version: Version,
    pub expires: DateTime<Utc>,
    pub mirrors: Vec<Mirror>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mirror {
    pub urlbase: String,
    pub metapath: String,
    pub targetspath: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metacontent: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targetscontent: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<Value>,
}
