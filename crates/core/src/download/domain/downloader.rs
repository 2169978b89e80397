use reqwest::Url;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("unsupported url scheme {0:?}, expected http or https")]
    UnsupportedScheme(String),
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("unexpected response status {0}")]
    Non200Status(u16),
    #[error("image exceeds the {limit} byte limit")]
    FileTooBig { limit: u64 },
    #[error("failed to read response body: {0}")]
    Read(#[source] std::io::Error),
}

/// Domain interface for fetching remote image bytes.
///
/// Called from blocking worker threads; implementations may block.
pub trait Downloader: Send + Sync {
    fn download(&self, url: &str) -> Result<Vec<u8>, DownloadError>;
}

/// Parses `url` and accepts only absolute http(s) URLs.
pub fn validate_image_url(url: &str) -> Result<Url, DownloadError> {
    let parsed = Url::parse(url).map_err(|e| DownloadError::InvalidUrl(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(DownloadError::UnsupportedScheme(other.to_string())),
    }
}
