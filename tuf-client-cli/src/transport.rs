use async_trait::async_trait;
use reqwest::StatusCode;
use std::io::ErrorKind;
use tracing::debug;
use tuf_client::remote::{TransportError, TufTransport};
use url::Url;

/// Fetches metadata over HTTP(S).
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        HttpTransport { client }
    }
}

#[async_trait]
impl TufTransport for HttpTransport {
    async fn fetch(&self, url: &Url, max_length: u64) -> Result<Vec<u8>, TransportError> {
        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| TransportError::Connect(err.to_string()))?;
        match response.status() {
            StatusCode::NOT_FOUND => return Err(TransportError::NotFound),
            status if !status.is_success() => {
                return Err(TransportError::Fetch(format!("{url} returned {status}")))
            }
            _ => {}
        }
        if response.content_length().is_some_and(|len| len > max_length) {
            return Err(TransportError::TooLarge { limit: max_length });
        }

        // the announced length is not binding, count while reading
        let mut data = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|err| TransportError::Fetch(err.to_string()))?
        {
            if (data.len() + chunk.len()) as u64 > max_length {
                return Err(TransportError::TooLarge { limit: max_length });
            }
            data.extend_from_slice(&chunk);
        }
        debug!(%url, length = data.len(), "fetched");
        Ok(data)
    }
}

/// Reads metadata of a repository that is available on disk, addressed by `file://` URLs.
#[derive(Debug, Clone, Default)]
pub struct FilesystemTransport;

#[async_trait]
impl TufTransport for FilesystemTransport {
    async fn fetch(&self, url: &Url, max_length: u64) -> Result<Vec<u8>, TransportError> {
        let path = url
            .to_file_path()
            .map_err(|_| TransportError::Fetch(format!("{url} is not a file URL")))?;
        let io_error = |err: std::io::Error| match err.kind() {
            ErrorKind::NotFound => TransportError::NotFound,
            _ => TransportError::Fetch(format!("{}: {err}", path.display())),
        };
        let metadata = tokio::fs::metadata(&path).await.map_err(io_error)?;
        if metadata.len() > max_length {
            return Err(TransportError::TooLarge { limit: max_length });
        }
        let data = tokio::fs::read(&path).await.map_err(io_error)?;
        if data.len() as u64 > max_length {
            return Err(TransportError::TooLarge { limit: max_length });
        }
        Ok(data)
    }
}

/// Picks the transport by the scheme of the repository URL.
#[derive(Debug, Clone)]
pub enum RepositoryTransport {
    Http(HttpTransport),
    Filesystem(FilesystemTransport),
}

impl RepositoryTransport {
    pub fn for_url(url: &Url) -> Self {
        match url.scheme() {
            "file" => RepositoryTransport::Filesystem(FilesystemTransport),
            _ => RepositoryTransport::Http(HttpTransport::default()),
        }
    }
}

#[async_trait]
impl TufTransport for RepositoryTransport {
    async fn fetch(&self, url: &Url, max_length: u64) -> Result<Vec<u8>, TransportError> {
        match self {
            RepositoryTransport::Http(transport) => transport.fetch(url, max_length).await,
            RepositoryTransport::Filesystem(transport) => transport.fetch(url, max_length).await,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{FilesystemTransport, RepositoryTransport};
    use tuf_client::remote::{TransportError, TufTransport};
    use url::Url;

    #[tokio::test]
    async fn test_filesystem_transport() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("timestamp.json"), b"0123456789").unwrap();
        let base = Url::from_directory_path(dir.path()).unwrap();
        let transport = FilesystemTransport;

        let url = base.join("timestamp.json").unwrap();
        assert_eq!(transport.fetch(&url, 10).await.unwrap(), b"0123456789");
        assert_eq!(
            transport.fetch(&url, 4).await,
            Err(TransportError::TooLarge { limit: 4 })
        );
        assert_eq!(
            transport.fetch(&base.join("2.root.json").unwrap(), 10).await,
            Err(TransportError::NotFound)
        );
    }

    #[test]
    fn test_transport_for_url() {
        assert!(matches!(
            RepositoryTransport::for_url(&Url::parse("file:///srv/repo/").unwrap()),
            RepositoryTransport::Filesystem(_)
        ));
        assert!(matches!(
            RepositoryTransport::for_url(&Url::parse("https://example.com/").unwrap()),
            RepositoryTransport::Http(_)
        ));
    }
}
