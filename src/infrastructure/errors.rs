use super::network::NetworkError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("corrupt bucket index: {0}")]
    Index(#[from] serde_json::Error),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error("invalid bucket name: {0:?}")]
    InvalidBucketName(String),
    #[error("{path} answered with status {status}")]
    BadStatus { path: String, status: u16 },
    #[error("bucket {bucket} has no usable entry for {path}")]
    MissingEntry { bucket: String, path: String },
}

pub type CacheResult<T> = Result<T, CacheError>;
