use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use reqwest::StatusCode;

use crate::download::domain::downloader::{validate_image_url, DownloadError, Downloader};

/// Blocking HTTP image fetcher with a timeout and a hard size ceiling.
///
/// Redirects are not followed; a 3xx is reported like any other non-200.
pub struct HttpDownloader {
    client: Client,
    max_file_size: u64,
}

impl HttpDownloader {
    pub fn new(timeout: Duration, max_file_size: u64) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .build()
            .map_err(DownloadError::Client)?;
        Ok(Self {
            client,
            max_file_size,
        })
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }
}

impl Downloader for HttpDownloader {
    fn download(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let url = validate_image_url(url)?;
        let response = self
            .client
            .get(url)
            .send()
            .map_err(DownloadError::Request)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DownloadError::Non200Status(status.as_u16()));
        }

        let limit = self.max_file_size;
        if response.content_length().is_some_and(|len| len > limit) {
            return Err(DownloadError::FileTooBig { limit });
        }

        // Read one byte past the limit to tell "exactly at" from "over".
        let mut body = Vec::new();
        response
            .take(limit.saturating_add(1))
            .read_to_end(&mut body)
            .map_err(DownloadError::Read)?;
        if body.len() as u64 > limit {
            return Err(DownloadError::FileTooBig { limit });
        }

        log::debug!("Downloaded {} bytes", body.len());
        Ok(body)
    }
}
