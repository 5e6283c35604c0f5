#[cfg(feature = "sign")]
pub mod sign;

use crate::constants::{HASH_SHA256, HASH_SHA512};
#[cfg(feature = "ecdsa")]
use crate::constants::SCHEME_ECDSA_P256_SHA256;
#[cfg(feature = "ed25519")]
use crate::constants::SCHEME_ED25519;
use crate::TufError;
use base64::Engine;
use core::fmt;
use sha2::{Digest, Sha256, Sha512};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Verifies signatures of one signature scheme.
pub trait SignatureVerifier: Send + Sync {
    /// Verify `sig` over `msg` with the public key as it is encoded in the `keyval.public` field of a key.
    fn verify(&self, public_key: &str, msg: &[u8], sig: &[u8]) -> Result<(), TufError>;
}

/// Computes the digest of one hash algorithm.
pub trait DigestAlgorithm: Send + Sync {
    fn digest(&self, data: &[u8]) -> Vec<u8>;
}

pub struct Sha256Digest;

impl DigestAlgorithm for Sha256Digest {
    fn digest(&self, data: &[u8]) -> Vec<u8> {
        Sha256::new().chain_update(data).finalize().to_vec()
    }
}

pub struct Sha512Digest;

impl DigestAlgorithm for Sha512Digest {
    fn digest(&self, data: &[u8]) -> Vec<u8> {
        Sha512::new().chain_update(data).finalize().to_vec()
    }
}

/// Ed25519 signatures, the public key is hex encoded.
#[cfg(feature = "ed25519")]
pub struct Ed25519Verifier;

#[cfg(feature = "ed25519")]
impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, public_key: &str, msg: &[u8], sig: &[u8]) -> Result<(), TufError> {
        use ::signature::Verifier;
        let public: [u8; 32] = hex::decode(public_key)
            .ok()
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or_else(|| TufError::InvalidKey("ed25519 key is not 32 hex encoded bytes".into()))?;
        let key = ed25519_dalek::VerifyingKey::from_bytes(&public)
            .map_err(|err| TufError::InvalidKey(err.to_string()))?;
        let sig = ed25519::Signature::from_slice(sig).map_err(|_| TufError::InvalidSignature)?;
        key.verify(msg, &sig).map_err(|_| TufError::InvalidSignature)
    }
}

/// ECDSA over P-256 with SHA-256. The public key is either PEM (SPKI) or hex encoded SEC1,
/// signatures are either ASN.1 DER or fixed size.
#[cfg(feature = "ecdsa")]
pub struct EcdsaP256Verifier;

#[cfg(feature = "ecdsa")]
impl SignatureVerifier for EcdsaP256Verifier {
    fn verify(&self, public_key: &str, msg: &[u8], sig: &[u8]) -> Result<(), TufError> {
        use ::signature::Verifier;
        use p256::ecdsa::{Signature, VerifyingKey};
        use p256::pkcs8::DecodePublicKey;

        let key = if public_key.trim_start().starts_with("-----BEGIN") {
            VerifyingKey::from_public_key_pem(public_key)
                .map_err(|err| TufError::InvalidKey(err.to_string()))?
        } else {
            hex::decode(public_key)
                .map_err(|err| TufError::InvalidKey(err.to_string()))
                .and_then(|bytes| {
                    VerifyingKey::from_sec1_bytes(&bytes)
                        .map_err(|err| TufError::InvalidKey(err.to_string()))
                })?
        };
        let sig = Signature::from_der(sig)
            .or_else(|_| Signature::from_slice(sig))
            .map_err(|_| TufError::InvalidSignature)?;
        key.verify(msg, &sig).map_err(|_| TufError::InvalidSignature)
    }
}

/// Registry of the signature schemes and hash algorithms the client can verify.
/// The trust logic only goes through this type and never depends on a specific cryptographic library.
#[derive(Clone)]
pub struct CryptoProvider {
    verifiers: BTreeMap<String, Arc<dyn SignatureVerifier>>,
    digests: BTreeMap<String, Arc<dyn DigestAlgorithm>>,
}

impl CryptoProvider {
    /// A provider without any scheme or algorithm.
    pub fn empty() -> Self {
        CryptoProvider {
            verifiers: BTreeMap::new(),
            digests: BTreeMap::new(),
        }
    }

    /// Register `verifier` for the signature scheme `scheme`, replacing a previous one.
    pub fn with_verifier(
        mut self,
        scheme: impl Into<String>,
        verifier: impl SignatureVerifier + 'static,
    ) -> Self {
        self.verifiers.insert(scheme.into(), Arc::new(verifier));
        self
    }

    /// Register `digest` for the hash algorithm `algorithm`, replacing a previous one.
    pub fn with_digest(
        mut self,
        algorithm: impl Into<String>,
        digest: impl DigestAlgorithm + 'static,
    ) -> Self {
        self.digests.insert(algorithm.into(), Arc::new(digest));
        self
    }

    pub fn verify(
        &self,
        scheme: &str,
        public_key: &str,
        msg: &[u8],
        sig: &[u8],
    ) -> Result<(), TufError> {
        self.verifiers
            .get(scheme)
            .ok_or_else(|| TufError::UnsupportedScheme(scheme.to_string()))?
            .verify(public_key, msg, sig)
    }

    pub fn digest(&self, algorithm: &str, data: &[u8]) -> Result<Vec<u8>, TufError> {
        self.digests
            .get(algorithm)
            .map(|digest| digest.digest(data))
            .ok_or_else(|| TufError::UnsupportedHashAlgorithm(algorithm.to_string()))
    }
}

impl Default for CryptoProvider {
    fn default() -> Self {
        let provider = CryptoProvider::empty()
            .with_digest(HASH_SHA256, Sha256Digest)
            .with_digest(HASH_SHA512, Sha512Digest);
        #[cfg(feature = "ed25519")]
        let provider = provider.with_verifier(SCHEME_ED25519, Ed25519Verifier);
        #[cfg(feature = "ecdsa")]
        let provider = provider.with_verifier(SCHEME_ECDSA_P256_SHA256, EcdsaP256Verifier);
        provider
    }
}

impl fmt::Debug for CryptoProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoProvider")
            .field("schemes", &self.verifiers.keys().collect::<Vec<_>>())
            .field("digests", &self.digests.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Compare an expected digest, hex (any case) or standard base64 encoded, with a computed one.
pub fn digest_matches(expected: &str, computed: &[u8]) -> bool {
    if let Ok(decoded) = hex::decode(expected) {
        if decoded == computed {
            return true;
        }
    }
    base64::engine::general_purpose::STANDARD
        .decode(expected)
        .map(|decoded| decoded == computed)
        .unwrap_or(false)
}
