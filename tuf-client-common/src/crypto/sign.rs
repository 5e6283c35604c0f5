use crate::TufError;
#[cfg(feature = "ecdsa")]
use crate::constants::{KEYTYPE_ECDSA, SCHEME_ECDSA_P256_SHA256};
#[cfg(feature = "ed25519")]
use crate::constants::{KEYTYPE_ED25519, SCHEME_ED25519};
#[cfg(feature = "ecdsa")]
use p256::ecdsa;
use signature::Signer;

/// Private key used to produce signatures for metadata, mainly used to build repositories for tests.
#[derive(Debug, Clone)]
pub enum SigningKey {
    #[cfg(feature = "ed25519")]
    Ed25519Dalek(ed25519_dalek::SigningKey),
    #[cfg(feature = "ecdsa")]
    Ecdsa(ecdsa::SigningKey),
}

#[derive(Debug, Clone, Copy)]
pub enum Cipher {
    #[cfg(feature = "ed25519")]
    Ed25519Dalek,
    #[cfg(feature = "ecdsa")]
    Ecdsa,
}

impl SigningKey {
    #[cfg(feature = "rand")]
    pub fn new(cipher: Cipher) -> Self {
        match cipher {
            #[cfg(feature = "ed25519")]
            Cipher::Ed25519Dalek => {
                Self::Ed25519Dalek(ed25519_dalek::SigningKey::generate(&mut rand_core::OsRng))
            }
            #[cfg(feature = "ecdsa")]
            Cipher::Ecdsa => Self::Ecdsa(ecdsa::SigningKey::random(&mut rand_core::OsRng)),
        }
    }

    /// Sign `msg`, ECDSA signatures are DER encoded.
    pub fn sign(&self, msg: &[u8]) -> Result<Vec<u8>, TufError> {
        match self {
            #[cfg(feature = "ed25519")]
            SigningKey::Ed25519Dalek(key) => Ok(key.sign(msg).to_vec()),
            #[cfg(feature = "ecdsa")]
            SigningKey::Ecdsa(key) => {
                let sig: ecdsa::Signature = key.sign(msg);
                Ok(sig.to_der().as_bytes().to_vec())
            }
        }
    }

    pub fn keytype(&self) -> &'static str {
        match self {
            #[cfg(feature = "ed25519")]
            SigningKey::Ed25519Dalek(_) => KEYTYPE_ED25519,
            #[cfg(feature = "ecdsa")]
            SigningKey::Ecdsa(_) => KEYTYPE_ECDSA,
        }
    }

    pub fn scheme(&self) -> &'static str {
        match self {
            #[cfg(feature = "ed25519")]
            SigningKey::Ed25519Dalek(_) => SCHEME_ED25519,
            #[cfg(feature = "ecdsa")]
            SigningKey::Ecdsa(_) => SCHEME_ECDSA_P256_SHA256,
        }
    }

    /// The public key as it appears in `keyval.public`: hex for Ed25519, PEM for ECDSA.
    pub fn public_value(&self) -> Result<String, TufError> {
        match self {
            #[cfg(feature = "ed25519")]
            SigningKey::Ed25519Dalek(key) => Ok(hex::encode(key.verifying_key().to_bytes())),
            #[cfg(feature = "ecdsa")]
            SigningKey::Ecdsa(key) => {
                use p256::pkcs8::{EncodePublicKey, LineEnding};
                key.verifying_key()
                    .to_public_key_pem(LineEnding::LF)
                    .map_err(|err| TufError::Encoding(err.to_string()))
            }
        }
    }
}
