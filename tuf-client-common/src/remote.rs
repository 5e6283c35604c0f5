use async_trait::async_trait;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The remote does not have the requested file.
    #[error("file not found")]
    NotFound,
    /// The response exceeded the permitted size and was aborted.
    #[error("response exceeds the limit of {limit} bytes")]
    TooLarge { limit: u64 },
    /// Failed to connect to the remote host.
    #[error("failed to connect: {0}")]
    Connect(String),
    /// Failed to fetch the specific file.
    #[error("fetch failed: {0}")]
    Fetch(String),
}

/// Trait that is used to represent the communication with a remote repository.
///
/// Implementors must enforce `max_length` themselves, i.e. abort the transfer as soon as more
/// than `max_length` bytes were received, and must report a missing file as
/// [TransportError::NotFound] because the root update relies on it to detect the end of the chain.
#[async_trait]
pub trait TufTransport: Send + Sync {
    /// Fetches the file at `url`, reading at most `max_length` bytes.
    async fn fetch(&self, url: &Url, max_length: u64) -> Result<Vec<u8>, TransportError>;
}
