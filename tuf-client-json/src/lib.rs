//! JSON encoding of the TUF metadata formats.
//!
//! Signatures are computed over the OLPC canonical JSON form of the `signed` object.
use chrono::{DateTime, Utc};
use olpc_cjson::CanonicalFormatter;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
#[cfg(any(test, feature = "sign"))]
use tuf_client_common::crypto::sign::SigningKey;
use tuf_client_common::constants::HASH_SHA256;
use tuf_client_common::{RoleType, TufError, Version};

pub mod mirrors;
pub mod root;
pub mod snapshot;
pub mod targets;
pub mod timestamp;

/// Lowercase hex SHA-256 digest of the canonical form of a [Key].
pub type KeyId = String;
pub type SpecVersion = String;
/// Maps a hash algorithm name to the hex or base64 encoded digest.
pub type Hashes = BTreeMap<String, String>;
pub type Length = u64;

/// Signature over the canonical form of the `signed` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub keyid: KeyId,
    /// Hex encoding of the signature.
    pub sig: String,
}

impl Signature {
    pub fn sig_bytes(&self) -> Result<Vec<u8>, TufError> {
        hex::decode(&self.sig).map_err(|err| TufError::Decoding(err.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyVal {
    pub public: String,
}

/// A public key as listed in the key registry of a root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    pub keytype: String,
    pub scheme: String,
    pub keyval: KeyVal,
}

impl Key {
    pub fn key_id(&self) -> Result<KeyId, TufError> {
        canonical_json(self).map(|encoded| hex::encode(Sha256::digest(encoded)))
    }

    #[cfg(any(test, feature = "sign"))]
    pub fn from_signing_key(key: &SigningKey) -> Result<Key, TufError> {
        Ok(Key {
            keytype: key.keytype().to_string(),
            scheme: key.scheme().to_string(),
            keyval: KeyVal {
                public: key.public_value()?,
            },
        })
    }
}

/// Serialize `value` to OLPC canonical JSON.
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, TufError> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, CanonicalFormatter::new());
    value
        .serialize(&mut ser)
        .map_err(|err| TufError::Encoding(err.to_string()))?;
    Ok(buf)
}

/// Describes one metadata file: the version it must have and optionally its length and digests.
/// Used by the timestamp to pin the snapshot and by the snapshot to pin all other roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaFile {
    pub version: Version,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<Length>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hashes: Hashes,
}

impl MetaFile {
    /// Pin `data` by version, length and SHA-256 digest.
    pub fn from_bytes(version: Version, data: &[u8]) -> Self {
        MetaFile {
            version,
            length: Some(data.len() as Length),
            hashes: BTreeMap::from([(HASH_SHA256.to_string(), hex::encode(Sha256::digest(data)))]),
        }
    }

    /// Pin only the version.
    pub fn from_version(version: Version) -> Self {
        MetaFile {
            version,
            length: None,
            hashes: BTreeMap::new(),
        }
    }
}

/// The body of a top-level metadata file.
pub trait Metadata: Serialize + DeserializeOwned + Clone {
    const ROLE: RoleType;

    fn version(&self) -> Version;

    fn expires(&self) -> DateTime<Utc>;
}

/// Wire envelope of a metadata file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signed<T> {
    pub signed: T,
    pub signatures: Vec<Signature>,
}

impl<T: Serialize> Signed<T> {
    /// Creates a signed object using the given signing keys from the data in `signed`.
    #[cfg(any(test, feature = "sign"))]
    pub fn from_signed(signed: T, signing_keys: &[SigningKey]) -> Result<Signed<T>, TufError> {
        let encoded = canonical_json(&signed)?;
        let signatures = signing_keys
            .iter()
            .map(|key| {
                Ok(Signature {
                    keyid: Key::from_signing_key(key)?.key_id()?,
                    sig: hex::encode(key.sign(&encoded)?),
                })
            })
            .collect::<Result<Vec<_>, TufError>>()?;
        Ok(Signed { signed, signatures })
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, TufError> {
        serde_json::to_vec(self).map_err(|err| TufError::Encoding(err.to_string()))
    }
}

/// A decoded metadata file.
///
/// Keeps the canonical form of the `signed` object as it was received so that fields this client
/// does not know about are still covered when the signatures are verified.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedMetadata<T> {
    pub signed: T,
    pub signatures: Vec<Signature>,
    canonical: Vec<u8>,
}

#[derive(Deserialize)]
struct RawSigned {
    signed: Value,
    signatures: Vec<Signature>,
}

impl<T: Metadata> SignedMetadata<T> {
    /// Decode a metadata file, the `_type` of the body has to match `T`.
    pub fn from_slice(data: &[u8]) -> Result<Self, TufError> {
        let raw: RawSigned =
            serde_json::from_slice(data).map_err(|err| TufError::Decoding(err.to_string()))?;
        if raw.signed.get("_type").and_then(Value::as_str) != Some(T::ROLE.name()) {
            return Err(TufError::UnexpectedRoleType { expected: T::ROLE });
        }
        let canonical = canonical_json(&raw.signed)?;
        let signed =
            serde_json::from_value(raw.signed).map_err(|err| TufError::Decoding(err.to_string()))?;
        Ok(SignedMetadata {
            signed,
            signatures: raw.signatures,
            canonical,
        })
    }

    /// The message the signatures are computed over.
    pub fn canonical_signed(&self) -> &[u8] {
        &self.canonical
    }

    pub fn version(&self) -> Version {
        self.signed.version()
    }

    pub fn expires(&self) -> DateTime<Utc> {
        self.signed.expires()
    }
}
