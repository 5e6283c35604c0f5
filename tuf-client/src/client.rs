use crate::config::ClientConfig;
use crate::role::root::update_root;
use crate::role::snapshot::update_snapshot;
use crate::role::timestamp::update_timestamp;
use crate::role::UpdateContext;
use crate::state::{ClientState, TrustedState};
use crate::urls::{RepositoryUrls, UrlBuilder};
use crate::verify::{check_signatures, Verified};
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tuf_client_common::crypto::CryptoProvider;
use tuf_client_common::remote::TufTransport;
use tuf_client_common::storage::TufStorage;
use tuf_client_common::{RoleType, TufError};
use tuf_client_json::root::Root;
use tuf_client_json::snapshot::Snapshot;
use tuf_client_json::timestamp::Timestamp;
use tuf_client_json::SignedMetadata;

/// A single trust session over one metadata store.
///
/// The client holds the metadata it trusts in a [TrustedState] and only replaces a role after the
/// corresponding update stage succeeded completely.
pub struct Client<S, T, U = RepositoryUrls> {
    config: ClientConfig,
    storage: S,
    transport: T,
    urls: U,
    crypto: CryptoProvider,
    cancel: CancellationToken,
    state: TrustedState,
}

impl<S, T, U> Client<S, T, U>
where
    S: TufStorage,
    T: TufTransport,
    U: UrlBuilder,
{
    pub fn new(config: ClientConfig, storage: S, transport: T, urls: U) -> Self {
        Client {
            config,
            storage,
            transport,
            urls,
            crypto: CryptoProvider::default(),
            cancel: CancellationToken::new(),
            state: TrustedState::default(),
        }
    }

    /// Replace the registry of signature schemes and hash algorithms.
    pub fn with_crypto(mut self, crypto: CryptoProvider) -> Self {
        self.crypto = crypto;
        self
    }

    /// Use `cancel` to abort running updates.
    pub fn with_cancellation_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Store the initial root that was distributed out of band.
    ///
    /// The root has to reach the threshold of its own root role. Does nothing if the storage
    /// already holds a root, that root is the trust anchor.
    pub async fn bootstrap_root(&mut self, data: &[u8]) -> Result<(), TufError> {
        if self.storage.load(RoleType::Root).await?.is_some() {
            debug!("storage already holds a root, ignoring bootstrap root");
            return Ok(());
        }
        let root = SignedMetadata::<Root>::from_slice(data)?;
        check_signatures(&root, &root.signed, RoleType::Root, &self.crypto)?;
        self.storage
            .persist_root_version(root.version(), data)
            .await?;
        self.storage.persist(RoleType::Root, data).await?;
        info!(version = root.version(), "bootstrapped trusted root");
        Ok(())
    }

    /// Run a full update with the current time as the fixed update start.
    pub async fn refresh(&mut self) -> Result<(), TufError> {
        self.refresh_at(Utc::now()).await
    }

    /// Run a full update, every expiry is compared against `update_start`.
    ///
    /// Starts from the metadata in the storage, so a new client resumes where a previous one
    /// stopped. Updates the root, timestamp and snapshot in this order and stops at the first
    /// failure. A failed stage leaves the metadata trusted before it in place.
    pub async fn refresh_at(&mut self, update_start: DateTime<Utc>) -> Result<(), TufError> {
        info!(%update_start, "refreshing trusted metadata");
        let mut ctx = UpdateContext {
            config: &self.config,
            storage: &mut self.storage,
            transport: &self.transport,
            urls: &self.urls,
            crypto: &self.crypto,
            cancel: &self.cancel,
        };
        self.state.root = ctx.load::<Root>().await?;
        self.state.timestamp = ctx.load::<Timestamp>().await?;
        self.state.snapshot = ctx.load::<Snapshot>().await?;
        debug!(state = ?self.state.state(), "loaded stored metadata");

        update_root(&mut ctx, &mut self.state, update_start).await?;
        update_timestamp(&mut ctx, &mut self.state, update_start).await?;
        update_snapshot(&mut ctx, &mut self.state, update_start).await?;
        info!(state = ?self.state.state(), "refresh finished");
        Ok(())
    }
}

impl<S, T, U> Client<S, T, U> {
    pub fn state(&self) -> ClientState {
        self.state.state()
    }

    pub fn trusted_root(&self) -> Option<&Verified<Root>> {
        self.state.root()
    }

    pub fn trusted_timestamp(&self) -> Option<&Verified<Timestamp>> {
        self.state.timestamp()
    }

    pub fn trusted_snapshot(&self) -> Option<&Verified<Snapshot>> {
        self.state.snapshot()
    }

    pub fn trusted_state(&self) -> &TrustedState {
        &self.state
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Token that aborts a running [Client::refresh] when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}

#[cfg(test)]
mod test {
    use crate::builder::RootBuilder;
    use crate::client::Client;
    use crate::config::ClientConfig;
    use crate::state::ClientState;
    use crate::urls::RepositoryUrls;
    use crate::utils::{MemoryStorage, MockTransport};
    use ed25519_dalek::SigningKey;
    use rand_core::OsRng;
    use tuf_client_common::crypto::sign::SigningKey::Ed25519Dalek;
    use tuf_client_common::ErrorKind;
    use tuf_client_json::Signed;
    use url::Url;

    fn client(storage: MemoryStorage) -> Client<MemoryStorage, MockTransport> {
        Client::new(
            ClientConfig::default(),
            storage,
            MockTransport::default(),
            RepositoryUrls::new(Url::parse("https://example.com/").unwrap()),
        )
    }

    #[tokio::test]
    async fn test_bootstrap_root() {
        let key = Ed25519Dalek(SigningKey::generate(&mut OsRng));
        let root = RootBuilder::default()
            .with_role_and_key("root", &[key.clone()], 1)
            .with_version(1)
            .build();
        let file = Signed::from_signed(root, &[key]).unwrap().to_vec().unwrap();

        let mut client = client(MemoryStorage::default());
        client.bootstrap_root(&file).await.unwrap();
        assert_eq!(client.state(), ClientState::Untrusted);
        let storage = client.into_storage();
        assert_eq!(storage.root.as_deref(), Some(file.as_slice()));
        assert!(storage.root_versions.contains_key(&1));
    }

    #[tokio::test]
    async fn test_bootstrap_root_keeps_stored_root() {
        let key = Ed25519Dalek(SigningKey::generate(&mut OsRng));
        let root = RootBuilder::default()
            .with_role_and_key("root", &[key.clone()], 1)
            .with_version(1)
            .build();
        let file = Signed::from_signed(root, &[key]).unwrap().to_vec().unwrap();

        let mut client = client(MemoryStorage::with_root(b"stored"));
        client.bootstrap_root(&file).await.unwrap();
        assert_eq!(
            client.into_storage().root.as_deref(),
            Some(b"stored".as_slice())
        );
    }

    #[tokio::test]
    async fn test_bootstrap_root_not_self_signed() {
        let key = Ed25519Dalek(SigningKey::generate(&mut OsRng));
        let other = Ed25519Dalek(SigningKey::generate(&mut OsRng));
        let root = RootBuilder::default()
            .with_role_and_key("root", &[key], 1)
            .with_version(1)
            .build();
        let file = Signed::from_signed(root, &[other]).unwrap().to_vec().unwrap();

        let mut client = client(MemoryStorage::default());
        let err = client
            .bootstrap_root(&file)
            .await
            .expect_err("accepted root that is not signed by its own keys");
        assert_eq!(err.kind(), ErrorKind::SignatureInsufficient);
        assert!(client.into_storage().root.is_none());
    }
}
