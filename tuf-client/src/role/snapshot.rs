use crate::role::UpdateContext;
use crate::state::TrustedState;
use crate::urls::UrlBuilder;
use crate::verify::{
    check_expiry, check_hashes, check_length, check_rollback, check_signatures, Verified,
};
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use tuf_client_common::constants::META_SNAPSHOT;
use tuf_client_common::crypto::CryptoProvider;
use tuf_client_common::remote::TufTransport;
use tuf_client_common::storage::TufStorage;
use tuf_client_common::{RoleType, TufError};
use tuf_client_json::root::Root;
use tuf_client_json::snapshot::Snapshot;
use tuf_client_json::timestamp::{Timestamp, TimestampMetaFile};
use tuf_client_json::SignedMetadata;

fn snapshot_pin(timestamp: &Timestamp) -> Result<&TimestampMetaFile, TufError> {
    timestamp
        .snapshot_meta()
        .ok_or_else(|| TufError::MissingMetaEntry(META_SNAPSHOT.to_string(), "timestamp"))
}

/// Verify a fetched snapshot against the pin of the trusted timestamp, the trusted root and the
/// previously trusted snapshot.
pub fn verify_snapshot(
    root: &Root,
    timestamp: &Timestamp,
    trusted: Option<&Snapshot>,
    candidate: &[u8],
    update_start: DateTime<Utc>,
    crypto: &CryptoProvider,
) -> Result<Verified<Snapshot>, TufError> {
    let pin = snapshot_pin(timestamp)?;
    check_length(candidate, pin.length)?;
    check_hashes(candidate, &pin.hashes, crypto)?;

    let next = SignedMetadata::<Snapshot>::from_slice(candidate)?;
    check_signatures(&next, root, RoleType::Snapshot, crypto)?;
    if next.version() != pin.version {
        return Err(TufError::SnapshotVersionMismatch {
            expected: pin.version,
            actual: next.version(),
        });
    }

    // no entry of the trusted snapshot may disappear or go back in version
    if let Some(trusted) = trusted {
        for (name, trusted_meta) in trusted.meta.iter() {
            let meta = next
                .signed
                .meta
                .get(name)
                .ok_or_else(|| TufError::MissingSnapshotEntry(name.clone()))?;
            check_rollback(name, trusted_meta.version, meta.version)?;
        }
    }

    check_expiry(next.expires(), update_start, RoleType::Snapshot)?;
    Ok(Verified::new(next, candidate.to_vec()))
}

/// Refer to the [TUF specification section on updating the snapshot role](https://theupdateframework.github.io/specification/latest/#update-snapshot) for more information.
pub async fn update_snapshot<S, T, U>(
    ctx: &mut UpdateContext<'_, S, T, U>,
    state: &mut TrustedState,
    update_start: DateTime<Utc>,
) -> Result<(), TufError>
where
    S: TufStorage,
    T: TufTransport,
    U: UrlBuilder,
{
    ctx.check_cancelled()?;
    let root = state.root().ok_or(TufError::MissingRoot)?;
    let timestamp = state.timestamp().ok_or(TufError::MissingTimestamp)?;
    let pin = snapshot_pin(timestamp.signed())?;
    let trusted = ctx.load::<Snapshot>().await?;

    let url = ctx.urls.snapshot_url(root.signed(), pin.version)?;
    let max_length = pin
        .length
        .unwrap_or(ctx.config.max_snapshot_metadata_size);
    let data = ctx.fetch(&url, max_length).await?;
    let next = verify_snapshot(
        root.signed(),
        timestamp.signed(),
        trusted.as_ref().map(Verified::signed),
        &data,
        update_start,
        ctx.crypto,
    )?;
    debug!(version = next.version(), "verified snapshot");

    ctx.storage.persist(RoleType::Snapshot, next.raw()).await?;
    info!(version = next.version(), "updated trusted snapshot");
    state.snapshot = Some(next);
    Ok(())
}

#[cfg(test)]
mod test {
    use crate::builder::{RootBuilder, SnapshotBuilder, TimestampBuilder};
    use crate::role::snapshot::verify_snapshot;
    use chrono::{TimeZone, Utc};
    use ed25519_dalek::SigningKey;
    use rand_core::OsRng;
    use tuf_client_common::crypto::sign::SigningKey::Ed25519Dalek;
    use tuf_client_common::crypto::CryptoProvider;
    use tuf_client_common::{ErrorKind, RoleType, TufError};
    use tuf_client_json::root::Root;
    use tuf_client_json::snapshot::Snapshot;
    use tuf_client_json::timestamp::Timestamp;
    use tuf_client_json::{MetaFile, Signed};

    struct Repo {
        root: Root,
        snapshot_key: tuf_client_common::crypto::sign::SigningKey,
    }

    fn repo() -> Repo {
        let root_key = Ed25519Dalek(SigningKey::generate(&mut OsRng));
        let snapshot_key = Ed25519Dalek(SigningKey::generate(&mut OsRng));
        let root = RootBuilder::default()
            .with_role_and_key("root", &[root_key], 1)
            .with_role_and_key("snapshot", &[snapshot_key.clone()], 1)
            .with_expiration_utc(2030, 1, 1, 0, 0, 0)
            .with_version(1)
            .build();
        Repo { root, snapshot_key }
    }

    fn snapshot(repo: &Repo, builder: SnapshotBuilder) -> Vec<u8> {
        Signed::from_signed(builder.build(), &[repo.snapshot_key.clone()])
            .unwrap()
            .to_vec()
            .unwrap()
    }

    fn pinning(file: &[u8], version: u64) -> Timestamp {
        TimestampBuilder::default()
            .with_expiration_utc(2030, 1, 1, 0, 0, 0)
            .with_snapshot(file, version)
            .with_version(1)
            .build()
    }

    fn update_start() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn decoded(file: &[u8]) -> Snapshot {
        tuf_client_json::SignedMetadata::<Snapshot>::from_slice(file)
            .unwrap()
            .signed
    }

    #[test]
    fn test_snapshot_valid() {
        let repo = repo();
        let file = snapshot(
            &repo,
            SnapshotBuilder::default()
                .with_expiration_utc(2030, 1, 1, 0, 0, 0)
                .with_meta("targets.json", 1)
                .with_version(3),
        );
        let verified = verify_snapshot(
            &repo.root,
            &pinning(&file, 3),
            None,
            &file,
            update_start(),
            &CryptoProvider::default(),
        )
        .expect("failed to verify valid snapshot");
        assert_eq!(verified.version(), 3);
    }

    #[test]
    fn test_snapshot_hash_mismatch() {
        let repo = repo();
        let builder = SnapshotBuilder::default()
            .with_expiration_utc(2030, 1, 1, 0, 0, 0)
            .with_version(3);
        let pinned = snapshot(&repo, builder.clone());
        // the served file differs from the pinned one
        let served = snapshot(&repo, builder.with_meta("targets.json", 1));
        let mut pin = MetaFile::from_bytes(3, &pinned);
        pin.length = None;
        let timestamp = TimestampBuilder::default()
            .with_expiration_utc(2030, 1, 1, 0, 0, 0)
            .with_snapshot_meta(pin)
            .build();
        let err = verify_snapshot(
            &repo.root,
            &timestamp,
            None,
            &served,
            update_start(),
            &CryptoProvider::default(),
        )
        .expect_err("accepted snapshot that does not match the pinned hash");
        assert_eq!(
            err,
            TufError::HashMismatch {
                algorithm: "sha256".into()
            }
        );
        assert_eq!(err.kind(), ErrorKind::IntegrityMismatch);
    }

    #[test]
    fn test_snapshot_version_mismatch() {
        let repo = repo();
        let file = snapshot(
            &repo,
            SnapshotBuilder::default()
                .with_expiration_utc(2030, 1, 1, 0, 0, 0)
                .with_version(2),
        );
        let timestamp = TimestampBuilder::default()
            .with_expiration_utc(2030, 1, 1, 0, 0, 0)
            .with_snapshot_version(3)
            .build();
        let err = verify_snapshot(
            &repo.root,
            &timestamp,
            None,
            &file,
            update_start(),
            &CryptoProvider::default(),
        )
        .expect_err("accepted snapshot with a version other than pinned");
        assert_eq!(
            err,
            TufError::SnapshotVersionMismatch {
                expected: 3,
                actual: 2
            }
        );
        assert_eq!(err.kind(), ErrorKind::IntegrityMismatch);
    }

    #[test]
    fn test_snapshot_length_mismatch() {
        let repo = repo();
        let file = snapshot(
            &repo,
            SnapshotBuilder::default()
                .with_expiration_utc(2030, 1, 1, 0, 0, 0)
                .with_version(1),
        );
        let mut pin = MetaFile::from_bytes(1, &file);
        pin.length = Some(file.len() as u64 + 1);
        let timestamp = TimestampBuilder::default()
            .with_expiration_utc(2030, 1, 1, 0, 0, 0)
            .with_snapshot_meta(pin)
            .build();
        assert!(matches!(
            verify_snapshot(
                &repo.root,
                &timestamp,
                None,
                &file,
                update_start(),
                &CryptoProvider::default()
            ),
            Err(TufError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_snapshot_removed_and_downgraded_entries() {
        let repo = repo();
        let trusted_file = snapshot(
            &repo,
            SnapshotBuilder::default()
                .with_expiration_utc(2030, 1, 1, 0, 0, 0)
                .with_meta("targets.json", 4)
                .with_meta("role1.json", 2)
                .with_version(1),
        );
        let trusted = decoded(&trusted_file);

        let removed = snapshot(
            &repo,
            SnapshotBuilder::default()
                .with_expiration_utc(2030, 1, 1, 0, 0, 0)
                .with_meta("targets.json", 4)
                .with_version(2),
        );
        assert_eq!(
            verify_snapshot(
                &repo.root,
                &pinning(&removed, 2),
                Some(&trusted),
                &removed,
                update_start(),
                &CryptoProvider::default()
            ),
            Err(TufError::MissingSnapshotEntry("role1.json".into()))
        );

        let downgraded = snapshot(
            &repo,
            SnapshotBuilder::default()
                .with_expiration_utc(2030, 1, 1, 0, 0, 0)
                .with_meta("targets.json", 3)
                .with_meta("role1.json", 2)
                .with_version(2),
        );
        let err = verify_snapshot(
            &repo.root,
            &pinning(&downgraded, 2),
            Some(&trusted),
            &downgraded,
            update_start(),
            &CryptoProvider::default(),
        )
        .expect_err("accepted downgraded targets version");
        assert_eq!(err.kind(), ErrorKind::RollbackAttack);

        let upgraded = snapshot(
            &repo,
            SnapshotBuilder::default()
                .with_expiration_utc(2030, 1, 1, 0, 0, 0)
                .with_meta("targets.json", 5)
                .with_meta("role1.json", 2)
                .with_meta("role2.json", 1)
                .with_version(2),
        );
        verify_snapshot(
            &repo.root,
            &pinning(&upgraded, 2),
            Some(&trusted),
            &upgraded,
            update_start(),
            &CryptoProvider::default(),
        )
        .expect("rejected snapshot that only adds and upgrades entries");
    }

    /// A snapshot expiring after the start of the update is valid, one expiring before it is not.
    #[test]
    fn test_snapshot_expiry_direction() {
        let repo = repo();
        let valid = snapshot(
            &repo,
            SnapshotBuilder::default()
                .with_expiration_utc(2030, 1, 1, 0, 0, 0)
                .with_version(1),
        );
        verify_snapshot(
            &repo.root,
            &pinning(&valid, 1),
            None,
            &valid,
            update_start(),
            &CryptoProvider::default(),
        )
        .expect("rejected snapshot that expires in the future");

        let expired = snapshot(
            &repo,
            SnapshotBuilder::default()
                .with_expiration_utc(2024, 1, 1, 0, 0, 0)
                .with_version(1),
        );
        assert_eq!(
            verify_snapshot(
                &repo.root,
                &pinning(&expired, 1),
                None,
                &expired,
                update_start(),
                &CryptoProvider::default()
            ),
            Err(TufError::Expired(RoleType::Snapshot))
        );
    }
}
