use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use tracing::debug;

/// A response as seen by the offline cache, whether it came from the network or a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl CachedResponse {
    pub fn ok(content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            content_type: Some(content_type.to_string()),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("request for {path} failed: {source}")]
    Request {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("network unavailable for {0}")]
    Unavailable(String),
}

/// Where cache misses are forwarded to.
///
/// A non-2xx answer is still a response, not an error: only failing to get
/// an answer at all is reported as [`NetworkError`].
pub trait Network {
    fn fetch(&self, path: &str) -> Result<CachedResponse, NetworkError>;
}

/// Fetches asset paths from a fixed origin over HTTP.
pub struct HttpNetwork {
    client: Client,
    origin: String,
}

impl HttpNetwork {
    pub fn new(origin: &str) -> Self {
        Self {
            client: Client::new(),
            origin: origin.trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.origin, path)
        } else {
            format!("{}/{}", self.origin, path)
        }
    }
}

impl Network for HttpNetwork {
    fn fetch(&self, path: &str) -> Result<CachedResponse, NetworkError> {
        let url = self.url_for(path);
        let wrap = |source| NetworkError::Request {
            path: path.to_string(),
            source,
        };

        let response = self.client.get(&url).send().map_err(wrap)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().map_err(wrap)?.to_vec();

        debug!(%url, status, bytes = body.len(), "fetched from network");
        Ok(CachedResponse {
            status,
            content_type,
            body,
        })
    }
}
