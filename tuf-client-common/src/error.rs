use crate::remote::TransportError;
use crate::{RoleType, Version};
use thiserror::Error;

/// Coarse classification of a [TufError], identifies which invariant failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The requested metadata does not exist. Ends the climb through root versions, never surfaced from it.
    NotFound,
    /// A version or version pin decreased where monotonicity is required.
    RollbackAttack,
    /// The metadata expired at or before the fixed update start time.
    Expired,
    /// Fewer valid distinct signatures than the threshold of the role.
    SignatureInsufficient,
    /// Hash, length or pin verification failed.
    IntegrityMismatch,
    /// A required field or cross-reference is missing or could not be decoded.
    Malformed,
    /// The caller aborted the update.
    Cancelled,
    /// Opaque failure of the transport.
    Transport,
    /// Opaque failure of the metadata storage.
    Store,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TufError {
    // fewer valid signatures than the threshold -> arbitrary software attack possible
    #[error("threshold of the {role} role not reached: {valid} of {threshold} signatures are valid")]
    SignatureThresholdNotReached {
        role: RoleType,
        valid: u64,
        threshold: u64,
    },
    #[error("the {role} role has an invalid threshold of 0")]
    InvalidThreshold { role: RoleType },
    // version number decreased -> rollback attack
    #[error("rollback attack detected on {what}: trusted version {trusted}, candidate version {candidate}")]
    RollbackAttack {
        what: String,
        trusted: Version,
        candidate: Version,
    },
    // root N+1 has to carry the version N+1
    #[error("requested root version {expected} but the remote served version {actual}")]
    UnexpectedRootVersion { expected: Version, actual: Version },
    // The expiration timestamp MUST be higher than the fixed update start time -> freeze attack
    #[error("the {0} metadata has expired")]
    Expired(RoleType),
    #[error("hash mismatch for algorithm {algorithm}")]
    HashMismatch { algorithm: String },
    #[error("hash algorithm {0} is not supported")]
    UnsupportedHashAlgorithm(String),
    #[error("length mismatch: expected {expected} bytes, got {actual} bytes")]
    LengthMismatch { expected: u64, actual: u64 },
    #[error("snapshot version {actual} does not match the version {expected} pinned by the timestamp")]
    SnapshotVersionMismatch { expected: Version, actual: Version },
    #[error("metadata entry {0} of the trusted snapshot is missing from the new snapshot")]
    MissingSnapshotEntry(String),
    #[error("no {0} entry in the {1} metadata")]
    MissingMetaEntry(String, &'static str),
    #[error("no trusted root metadata is available")]
    MissingRoot,
    #[error("no trusted timestamp metadata is available")]
    MissingTimestamp,
    #[error("expected {expected} metadata")]
    UnexpectedRoleType { expected: RoleType },
    #[error("failed to decode metadata: {0}")]
    Decoding(String),
    #[error("failed to encode metadata: {0}")]
    Encoding(String),
    #[error("update was cancelled")]
    Cancelled,
    #[error("failed to fetch metadata: {0}")]
    Transport(TransportError),
    #[error("metadata storage failed: {0}")]
    Storage(String),
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("invalid signature")]
    InvalidSignature,
    #[error("signature scheme {0} is not supported")]
    UnsupportedScheme(String),
    #[error("invalid repository URL: {0}")]
    InvalidUrl(String),
}

impl TufError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TufError::SignatureThresholdNotReached { .. }
            | TufError::InvalidSignature
            | TufError::UnsupportedScheme(_) => ErrorKind::SignatureInsufficient,
            TufError::RollbackAttack { .. } => ErrorKind::RollbackAttack,
            TufError::UnexpectedRootVersion { actual, expected } if actual < expected => {
                ErrorKind::RollbackAttack
            }
            TufError::UnexpectedRootVersion { .. } => ErrorKind::IntegrityMismatch,
            TufError::Expired(_) => ErrorKind::Expired,
            TufError::HashMismatch { .. }
            | TufError::UnsupportedHashAlgorithm(_)
            | TufError::LengthMismatch { .. }
            | TufError::SnapshotVersionMismatch { .. }
            | TufError::MissingSnapshotEntry(_) => ErrorKind::IntegrityMismatch,
            TufError::InvalidThreshold { .. }
            | TufError::MissingMetaEntry(..)
            | TufError::MissingTimestamp
            | TufError::UnexpectedRoleType { .. }
            | TufError::Decoding(_)
            | TufError::Encoding(_)
            | TufError::InvalidKey(_)
            | TufError::InvalidUrl(_) => ErrorKind::Malformed,
            TufError::Cancelled => ErrorKind::Cancelled,
            TufError::Transport(TransportError::NotFound) => ErrorKind::NotFound,
            TufError::Transport(_) => ErrorKind::Transport,
            TufError::MissingRoot | TufError::Storage(_) => ErrorKind::Store,
        }
    }
}

impl From<TransportError> for TufError {
    fn from(value: TransportError) -> Self {
        TufError::Transport(value)
    }
}
