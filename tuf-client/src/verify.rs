use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use tracing::{debug, warn};
use tuf_client_common::crypto::{digest_matches, CryptoProvider};
use tuf_client_common::{RoleType, TufError, Version};
use tuf_client_json::root::Root;
use tuf_client_json::{Hashes, Length, Metadata, SignedMetadata};

/// Metadata that passed every check of its update stage, together with the bytes it was decoded from.
#[derive(Debug, Clone, PartialEq)]
pub struct Verified<T> {
    metadata: SignedMetadata<T>,
    raw: Vec<u8>,
}

impl<T: Metadata> Verified<T> {
    /// Only the update stages and the trusted storage create verified metadata.
    pub(crate) fn new(metadata: SignedMetadata<T>, raw: Vec<u8>) -> Self {
        Verified { metadata, raw }
    }

    pub fn signed(&self) -> &T {
        &self.metadata.signed
    }

    pub fn metadata(&self) -> &SignedMetadata<T> {
        &self.metadata
    }

    /// The file exactly as it was fetched.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn version(&self) -> Version {
        self.metadata.version()
    }

    pub fn expires(&self) -> DateTime<Utc> {
        self.metadata.expires()
    }
}

/// Verify that `metadata` carries at least `threshold` valid signatures of distinct keys of `role`
/// as delegated by `root`.
///
/// A signature only counts if its key is listed for the role, is present in the key registry of
/// `root`, uses a scheme known to `crypto` and verifies. Every key counts once.
pub fn check_signatures<T: Metadata>(
    metadata: &SignedMetadata<T>,
    root: &Root,
    role: RoleType,
    crypto: &CryptoProvider,
) -> Result<(), TufError> {
    let role_keys = root.role(role);
    if role_keys.threshold == 0 {
        return Err(TufError::InvalidThreshold { role });
    }
    let msg = metadata.canonical_signed();
    // A key is only removed after it produced a valid signature.
    let mut unused: BTreeSet<&str> = role_keys.keyids.iter().map(String::as_str).collect();
    let valid = metadata
        .signatures
        .iter()
        .filter(|sig| {
            if !unused.contains(sig.keyid.as_str()) {
                return false;
            }
            let Some(key) = root.keys.get(&sig.keyid) else {
                warn!(keyid = %sig.keyid, %role, "key of signature is not in the key registry");
                return false;
            };
            match sig
                .sig_bytes()
                .and_then(|raw| crypto.verify(&key.scheme, &key.keyval.public, msg, &raw))
            {
                Ok(()) => {
                    unused.remove(sig.keyid.as_str());
                    true
                }
                Err(err) => {
                    warn!(keyid = %sig.keyid, %role, %err, "discarding signature");
                    false
                }
            }
        })
        .count() as u64;

    if valid < role_keys.threshold {
        return Err(TufError::SignatureThresholdNotReached {
            role,
            valid,
            threshold: role_keys.threshold,
        });
    }
    debug!(%role, valid, threshold = role_keys.threshold, "signature threshold reached");
    Ok(())
}

/// Verify `data` against every digest in `expected`. An empty set of hashes is accepted.
pub fn check_hashes(data: &[u8], expected: &Hashes, crypto: &CryptoProvider) -> Result<(), TufError> {
    for (algorithm, digest) in expected {
        let computed = crypto.digest(algorithm, data)?;
        if !digest_matches(digest, &computed) {
            return Err(TufError::HashMismatch {
                algorithm: algorithm.clone(),
            });
        }
    }
    Ok(())
}

/// Verify the length of `data` if a length is declared.
pub fn check_length(data: &[u8], expected: Option<Length>) -> Result<(), TufError> {
    match expected {
        Some(expected) if expected != data.len() as Length => Err(TufError::LengthMismatch {
            expected,
            actual: data.len() as Length,
        }),
        _ => Ok(()),
    }
}

/// Versions must never decrease, equal versions are accepted.
pub fn check_rollback(what: &str, trusted: Version, candidate: Version) -> Result<(), TufError> {
    if candidate < trusted {
        return Err(TufError::RollbackAttack {
            what: what.to_string(),
            trusted,
            candidate,
        });
    }
    Ok(())
}

/// Metadata has to expire strictly after the start of the update.
pub fn check_expiry(
    expires: DateTime<Utc>,
    update_start: DateTime<Utc>,
    role: RoleType,
) -> Result<(), TufError> {
    if expires <= update_start {
        return Err(TufError::Expired(role));
    }
    Ok(())
}
