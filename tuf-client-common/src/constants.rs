/// File name of the root metadata.
pub const META_ROOT: &str = "root.json";
/// File name of the timestamp metadata.
pub const META_TIMESTAMP: &str = "timestamp.json";
/// File name of the snapshot metadata, also the key of the snapshot entry in the timestamp `meta`.
pub const META_SNAPSHOT: &str = "snapshot.json";
/// File name of the top-level targets metadata.
pub const META_TARGETS: &str = "targets.json";

pub const DEFAULT_MAX_ROOT_METADATA_SIZE: u64 = 512 * 1024;
pub const DEFAULT_MAX_TIMESTAMP_METADATA_SIZE: u64 = 16 * 1024;
pub const DEFAULT_MAX_SNAPSHOT_METADATA_SIZE: u64 = 2 * 1024 * 1024;
pub const DEFAULT_MAX_ROOT_METADATA_FETCHES: u32 = 1024;

pub const SCHEME_ED25519: &str = "ed25519";
pub const SCHEME_ECDSA_P256_SHA256: &str = "ecdsa-sha2-nistp256";
pub const KEYTYPE_ED25519: &str = "ed25519";
pub const KEYTYPE_ECDSA: &str = "ecdsa";

pub const HASH_SHA256: &str = "sha256";
pub const HASH_SHA512: &str = "sha512";
