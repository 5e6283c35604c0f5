use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;
use tuf_client_common::constants::META_SNAPSHOT;
use tuf_client_common::crypto::sign::SigningKey;
use tuf_client_common::Version;
use tuf_client_json::root::{Root, RootRole, RootRoles};
use tuf_client_json::snapshot::Snapshot;
use tuf_client_json::timestamp::Timestamp;
use tuf_client_json::{Key, KeyId, MetaFile, SpecVersion};

const SPEC_VERSION: &str = "1.0.31";

fn spec_version() -> SpecVersion {
    SPEC_VERSION.to_string()
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

fn utc(year: i32, month: u32, day: u32, hour: u32, minutes: u32, seconds: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minutes, seconds)
        .single()
        .expect("invalid UTC date")
}

/// Public key entry of a signing key.
pub fn public_key(key: &SigningKey) -> Key {
    Key::from_signing_key(key).expect("failed to encode public key")
}

/// ID of the public key of a signing key.
pub fn key_id(key: &SigningKey) -> KeyId {
    public_key(key).key_id().expect("failed to calculate key ID")
}

fn empty_role() -> RootRole {
    RootRole {
        keyids: Vec::new(),
        threshold: 1,
    }
}

#[derive(Debug, Clone)]
pub struct RootBuilder {
    root: Root,
}

impl Default for RootBuilder {
    fn default() -> Self {
        RootBuilder {
            root: Root {
                spec_version: spec_version(),
                consistent_snapshot: false,
                version: 0,
                expires: epoch(),
                keys: BTreeMap::new(),
                roles: RootRoles {
                    root: empty_role(),
                    snapshot: empty_role(),
                    targets: empty_role(),
                    timestamp: empty_role(),
                    mirrors: None,
                },
            },
        }
    }
}

impl RootBuilder {
    /// Set the expiration date of the root role to this [UTC date](https://en.wikipedia.org/wiki/Coordinated_Universal_Time).
    pub fn with_expiration_utc(
        mut self,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minutes: u32,
        seconds: u32,
    ) -> Self {
        self.root.expires = utc(year, month, day, hour, minutes, seconds);
        self
    }

    pub fn with_expiration(mut self, expires: DateTime<Utc>) -> Self {
        self.root.expires = expires;
        self
    }

    /// Set a role of the root file, replacing the previous one.
    pub fn with_role(mut self, name: &str, role: RootRole) -> Self {
        match name {
            "root" => self.root.roles.root = role,
            "snapshot" => self.root.roles.snapshot = role,
            "targets" => self.root.roles.targets = role,
            "timestamp" => self.root.roles.timestamp = role,
            "mirrors" => self.root.roles.mirrors = Some(role),
            _ => panic!("unknown role {name}"),
        }
        self
    }

    /// Add a key to the key registry of the root file.
    pub fn with_key(mut self, key: Key) -> Self {
        let key_id = key.key_id().expect("failed to calculate key ID");
        self.root.keys.insert(key_id, key);
        self
    }

    /// Set a role that is made up of the given keys and add the keys to the registry.
    pub fn with_role_and_key(self, role: &str, keys: &[SigningKey], threshold: u64) -> Self {
        let builder = self.with_role(
            role,
            RootRole {
                keyids: keys.iter().map(key_id).collect(),
                threshold,
            },
        );
        keys.iter()
            .fold(builder, |builder, key| builder.with_key(public_key(key)))
    }

    /// Set the version of the root file.
    pub fn with_version(mut self, version: Version) -> Self {
        self.root.version = version;
        self
    }

    /// Set the flag whether [consistent snapshots](https://theupdateframework.github.io/specification/latest/#consistent-snapshots) are enabled.
    pub fn consistent_snapshot(mut self, consistent_snapshot: bool) -> Self {
        self.root.consistent_snapshot = consistent_snapshot;
        self
    }

    /// Return the constructed root file.
    pub fn build(self) -> Root {
        self.root
    }
}

#[derive(Debug, Clone)]
pub struct TimestampBuilder {
    inner: Timestamp,
}

impl Default for TimestampBuilder {
    fn default() -> Self {
        TimestampBuilder {
            inner: Timestamp {
                spec_version: spec_version(),
                version: 0,
                expires: epoch(),
                meta: BTreeMap::new(),
            },
        }
    }
}

impl TimestampBuilder {
    /// Pin the encoded snapshot file by version, length and hash.
    pub fn with_snapshot(self, snapshot: &[u8], version: Version) -> Self {
        self.with_snapshot_meta(MetaFile::from_bytes(version, snapshot))
    }

    /// Pin only the version of the snapshot file.
    pub fn with_snapshot_version(self, version: Version) -> Self {
        self.with_snapshot_meta(MetaFile::from_version(version))
    }

    pub fn with_snapshot_meta(mut self, meta: MetaFile) -> Self {
        self.inner.meta.insert(META_SNAPSHOT.to_string(), meta);
        self
    }

    /// Set the expiration date of the timestamp role to this [UTC date](https://en.wikipedia.org/wiki/Coordinated_Universal_Time).
    pub fn with_expiration_utc(
        mut self,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minutes: u32,
        seconds: u32,
    ) -> Self {
        self.inner.expires = utc(year, month, day, hour, minutes, seconds);
        self
    }

    /// Set the version of the timestamp file. Has to increase between iterations.
    pub fn with_version(mut self, version: Version) -> Self {
        self.inner.version = version;
        self
    }

    /// Finish the construction.
    pub fn build(self) -> Timestamp {
        self.inner
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    inner: Snapshot,
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        SnapshotBuilder {
            inner: Snapshot {
                spec_version: spec_version(),
                version: 0,
                expires: epoch(),
                meta: BTreeMap::new(),
            },
        }
    }
}

impl SnapshotBuilder {
    /// Set the expiration date of the snapshot role to this [UTC date](https://en.wikipedia.org/wiki/Coordinated_Universal_Time).
    pub fn with_expiration_utc(
        mut self,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minutes: u32,
        seconds: u32,
    ) -> Self {
        self.inner.expires = utc(year, month, day, hour, minutes, seconds);
        self
    }

    /// Set the version of the snapshot file. Has to increase between iterations.
    pub fn with_version(mut self, version: Version) -> Self {
        self.inner.version = version;
        self
    }

    /// List the metadata file `name` with only its version.
    pub fn with_meta(mut self, name: &str, version: Version) -> Self {
        self.inner
            .meta
            .insert(name.to_string(), MetaFile::from_version(version));
        self
    }

    /// List the metadata file `name` with version, length and hash of `data`.
    pub fn with_meta_file(mut self, name: &str, data: &[u8], version: Version) -> Self {
        self.inner
            .meta
            .insert(name.to_string(), MetaFile::from_bytes(version, data));
        self
    }

    pub fn build(self) -> Snapshot {
        self.inner
    }
}
