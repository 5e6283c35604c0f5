use crate::role::UpdateContext;
use crate::state::TrustedState;
use crate::urls::UrlBuilder;
use crate::verify::{check_expiry, check_rollback, check_signatures, Verified};
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use tuf_client_common::crypto::CryptoProvider;
use tuf_client_common::remote::{TransportError, TufTransport};
use tuf_client_common::storage::TufStorage;
use tuf_client_common::{RoleType, TufError, Version};
use tuf_client_json::root::Root;
use tuf_client_json::SignedMetadata;

/// Verify that `candidate`, fetched as version `expected_version`, may replace the `trusted` root.
/// Returns the new root if successful.
pub fn verify_root_step(
    trusted: &Root,
    candidate: &[u8],
    expected_version: Version,
    crypto: &CryptoProvider,
) -> Result<Verified<Root>, TufError> {
    let next = SignedMetadata::<Root>::from_slice(candidate)?;
    // signed by the trusted root
    check_signatures(&next, trusted, RoleType::Root, crypto)?;
    // and by itself
    check_signatures(&next, &next.signed, RoleType::Root, crypto)?;
    check_rollback("root", trusted.version, next.version())?;
    if next.version() != expected_version {
        return Err(TufError::UnexpectedRootVersion {
            expected: expected_version,
            actual: next.version(),
        });
    }
    Ok(Verified::new(next, candidate.to_vec()))
}

/// Refer to the [TUF specification section on updating the root role](https://theupdateframework.github.io/specification/latest/#update-root) for more information.
///
/// Climbs the chain of root versions, nothing is persisted or adopted before the final root passed
/// every check.
pub async fn update_root<S, T, U>(
    ctx: &mut UpdateContext<'_, S, T, U>,
    state: &mut TrustedState,
    update_start: DateTime<Utc>,
) -> Result<(), TufError>
where
    S: TufStorage,
    T: TufTransport,
    U: UrlBuilder,
{
    let initial = ctx.load::<Root>().await?.ok_or(TufError::MissingRoot)?;
    debug!(version = initial.version(), "loaded trusted root");

    let mut current = initial.clone();
    let mut climbed = Vec::new();
    for _ in 0..ctx.config.max_root_metadata_fetches {
        ctx.check_cancelled()?;
        let next_version = current.version().saturating_add(1);
        let url = ctx.urls.root_url(next_version)?;
        let data = match ctx.fetch(&url, ctx.config.max_root_metadata_size).await {
            Ok(data) => data,
            Err(TufError::Transport(TransportError::NotFound)) => {
                debug!(version = next_version, "no newer root available");
                break;
            }
            Err(err) => return Err(err),
        };
        let next = verify_root_step(current.signed(), &data, next_version, ctx.crypto)?;
        debug!(version = next.version(), "verified root");
        climbed.push(next.clone());
        current = next;
    }

    check_expiry(current.expires(), update_start, RoleType::Root)?;

    // delete timestamp and snapshot metadata when keys are rotated (5.3.11)
    // before the new root is stored, otherwise a failed delete hides the rotation from the next update
    let rotated = initial
        .signed()
        .roles
        .timestamp
        .rotated(&current.signed().roles.timestamp)
        || initial
            .signed()
            .roles
            .snapshot
            .rotated(&current.signed().roles.snapshot);
    if rotated {
        info!("timestamp or snapshot keys were rotated, discarding trusted timestamp and snapshot");
        ctx.storage.delete(RoleType::Timestamp).await?;
        ctx.storage.delete(RoleType::Snapshot).await?;
        state.discard_timestamp_and_snapshot();
    }

    for root in climbed.iter() {
        ctx.storage
            .persist_root_version(root.version(), root.raw())
            .await?;
    }
    if let Some(root) = climbed.last() {
        ctx.storage.persist(RoleType::Root, root.raw()).await?;
        info!(
            from = initial.version(),
            to = root.version(),
            "updated trusted root"
        );
    }

    state.update_start = Some(update_start);
    state.root = Some(current);
    Ok(())
}
