pub mod root;
pub mod snapshot;
pub mod timestamp;

use crate::config::ClientConfig;
use crate::urls::UrlBuilder;
use crate::verify::Verified;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tuf_client_common::crypto::CryptoProvider;
use tuf_client_common::remote::{TransportError, TufTransport};
use tuf_client_common::storage::TufStorage;
use tuf_client_common::TufError;
use tuf_client_json::{Metadata, SignedMetadata};
use url::Url;

/// The collaborators an update stage works with.
pub struct UpdateContext<'a, S, T, U> {
    pub config: &'a ClientConfig,
    pub storage: &'a mut S,
    pub transport: &'a T,
    pub urls: &'a U,
    pub crypto: &'a CryptoProvider,
    pub cancel: &'a CancellationToken,
}

impl<'a, S, T, U> UpdateContext<'a, S, T, U>
where
    S: TufStorage,
    T: TufTransport,
    U: UrlBuilder,
{
    pub(crate) fn check_cancelled(&self) -> Result<(), TufError> {
        if self.cancel.is_cancelled() {
            return Err(TufError::Cancelled);
        }
        Ok(())
    }

    /// Fetch at most `max_length` bytes from `url`, aborting as soon as the update is cancelled.
    pub(crate) async fn fetch(&self, url: &Url, max_length: u64) -> Result<Vec<u8>, TufError> {
        debug!(%url, max_length, "fetching metadata");
        let data = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(TufError::Cancelled),
            data = self.transport.fetch(url, max_length) => data?,
        };
        if data.len() as u64 > max_length {
            return Err(TransportError::TooLarge { limit: max_length }.into());
        }
        Ok(data)
    }

    /// Load the stored metadata of `M`. The storage is trusted, so it is not verified again.
    pub(crate) async fn load<M: Metadata>(&self) -> Result<Option<Verified<M>>, TufError> {
        let Some(data) = self.storage.load(M::ROLE).await? else {
            return Ok(None);
        };
        let metadata = SignedMetadata::<M>::from_slice(&data)?;
        Ok(Some(Verified::new(metadata, data)))
    }
}
