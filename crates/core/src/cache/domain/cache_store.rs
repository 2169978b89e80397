use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CacheError {
    #[error("no cached response for key")]
    Miss,
    #[error("cache store lock poisoned")]
    Poisoned,
}

/// A response captured for replay: status, headers and body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Domain interface for storing HTTP responses by request key.
pub trait CacheStore: Send + Sync {
    fn save(&self, key: &str, response: CachedResponse) -> Result<(), CacheError>;
    fn load(&self, key: &str) -> Result<CachedResponse, CacheError>;
}
