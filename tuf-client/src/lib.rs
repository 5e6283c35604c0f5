//! A client for [The Update Framework (TUF)](https://theupdateframework.github.io/specification/latest/)
//! that establishes and refreshes the chain of trust over the root, timestamp and snapshot roles.
//!
//! Metadata is encoded as canonical JSON, see the `tuf-client-json` crate.
//!
//! ## Example
//!
//! ```ignore
//! use tuf_client::{Client, ClientConfig, RepositoryUrls};
//! use tuf_client::utils::MemoryStorage;
//! use url::Url;
//!
//! const TUF_ROOT: &[u8] = include_bytes!("path/to/1.root.json");
//!
//! let transport = { panic!("add your own transport here") };
//! let urls = RepositoryUrls::new(Url::parse("https://example.com/metadata/")?);
//! let mut client = Client::new(ClientConfig::default(), MemoryStorage::default(), transport, urls);
//! client.bootstrap_root(TUF_ROOT).await?;
//! client.refresh().await?;
//! let snapshot = client.trusted_snapshot().expect("refresh succeeded");
//! ```
//!
//! ## Storage
//!
//! If you need an implementor of the [TufStorage] trait you can use [utils::MemoryStorage] or implement your own solution using the trait.
//!
//! ## TufTransport/Remote
//!
//! This crate does not provide a network implementation of the [TufTransport] trait.
//! The `tuf-client-cli` crate has one based on `reqwest`.

/// Module for builders to create TUF metadata.
#[cfg(feature = "sign")]
pub mod builder;
mod client;
/// Limits of an update.
pub mod config;
/// Implementation of the update stages of the TUF roles.
pub mod role;
/// Metadata trusted by a client.
pub mod state;
/// Locations of metadata files in a repository.
pub mod urls;
/// Utility functions.
pub mod utils;
/// Checks shared by the update stages.
pub mod verify;

pub use client::Client;
pub use config::ClientConfig;
pub use state::{ClientState, TrustedState};
pub use urls::{RepositoryUrls, UrlBuilder};

/// Error types and more traits.
pub use tuf_client_common as common;
/// Re-export of the metadata format.
pub use tuf_client_json as json;
pub use tuf_client_common::{remote::TufTransport, storage::TufStorage, ErrorKind, TufError};
/// Re-export of constants.
pub use tuf_client_common::constants;
/// Fetching TUF files from remotes.
pub use tuf_client_common::remote;
/// Storage of TUF files. Only has traits, there is an in-memory implementation available in [utils::MemoryStorage].
pub use tuf_client_common::storage;
/// Re-export of the cancellation token used by [Client].
pub use tokio_util::sync::CancellationToken;
