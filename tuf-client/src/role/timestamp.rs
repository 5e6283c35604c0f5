use crate::role::UpdateContext;
use crate::state::TrustedState;
use crate::urls::UrlBuilder;
use crate::verify::{check_expiry, check_rollback, check_signatures, Verified};
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use tuf_client_common::constants::META_SNAPSHOT;
use tuf_client_common::crypto::CryptoProvider;
use tuf_client_common::remote::TufTransport;
use tuf_client_common::storage::TufStorage;
use tuf_client_common::{RoleType, TufError};
use tuf_client_json::root::Root;
use tuf_client_json::timestamp::{Timestamp, TimestampMetaFile};
use tuf_client_json::SignedMetadata;

fn snapshot_pin(timestamp: &Timestamp) -> Result<&TimestampMetaFile, TufError> {
    timestamp
        .snapshot_meta()
        .ok_or_else(|| TufError::MissingMetaEntry(META_SNAPSHOT.to_string(), "timestamp"))
}

/// Verify a fetched timestamp against the trusted root and the previously trusted timestamp.
pub fn verify_timestamp(
    root: &Root,
    trusted: Option<&Timestamp>,
    candidate: &[u8],
    update_start: DateTime<Utc>,
    crypto: &CryptoProvider,
) -> Result<Verified<Timestamp>, TufError> {
    let next = SignedMetadata::<Timestamp>::from_slice(candidate)?;
    check_signatures(&next, root, RoleType::Timestamp, crypto)?;
    let next_pin = snapshot_pin(&next.signed)?;

    if let Some(trusted) = trusted {
        check_rollback("timestamp", trusted.version, next.version())?;
        let trusted_pin = snapshot_pin(trusted)?;
        check_rollback(
            "snapshot version pinned by the timestamp",
            trusted_pin.version,
            next_pin.version,
        )?;
    }

    check_expiry(next.expires(), update_start, RoleType::Timestamp)?;
    Ok(Verified::new(next, candidate.to_vec()))
}

/// Refer to the [TUF specification section on updating the timestamp role](https://theupdateframework.github.io/specification/latest/#update-timestamp) for more information.
pub async fn update_timestamp<S, T, U>(
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
    let trusted = ctx.load::<Timestamp>().await?;
    let url = ctx.urls.timestamp_url()?;
    let data = ctx
        .fetch(&url, ctx.config.max_timestamp_metadata_size)
        .await?;
    let next = verify_timestamp(
        root.signed(),
        trusted.as_ref().map(Verified::signed),
        &data,
        update_start,
        ctx.crypto,
    )?;
    debug!(version = next.version(), "verified timestamp");

    ctx.storage.persist(RoleType::Timestamp, next.raw()).await?;
    info!(version = next.version(), "updated trusted timestamp");
    state.timestamp = Some(next);
    Ok(())
}
