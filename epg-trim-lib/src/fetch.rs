//! Retrieval of the playlist and the compressed guide.
//!
//! Locations with an `http://` or `https://` scheme are downloaded; anything
//! else (including `file://` locations) is read from the local filesystem.

use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use flate2::read::MultiGzDecoder;
use reqwest::blocking::Client;

use crate::error::FetchError;
use crate::settings::Settings;

const USER_AGENT: &str = concat!("epg-trim/", env!("CARGO_PKG_VERSION"));

/// Where documents come from. The pipeline only talks to this trait, so
/// tests can serve documents from memory.
pub trait DocumentSource {
    /// Fetch a plain-text document. Invalid UTF-8 is replaced, never fatal.
    fn fetch_text(&self, location: &str) -> Result<String, FetchError>;

    /// Fetch a gzip-compressed document and return its decompressed text.
    fn fetch_gzip_text(&self, location: &str) -> Result<String, FetchError>;
}

/// Blocking HTTP source with separate timeouts for the playlist and guide.
pub struct HttpSource {
    client: Client,
    playlist_timeout: Duration,
    guide_timeout: Duration,
}

impl HttpSource {
    pub fn new(playlist_timeout: Duration, guide_timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            playlist_timeout,
            guide_timeout,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, FetchError> {
        Self::new(settings.playlist_timeout(), settings.guide_timeout())
    }

    fn fetch_bytes(&self, location: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
        if let Some(path) = local_path(location) {
            let bytes = std::fs::read(&path).map_err(|e| FetchError::read(&path, e))?;
            log::debug!("Read {} bytes from {}", bytes.len(), path.display());
            return Ok(bytes);
        }

        let response = self
            .client
            .get(location)
            .timeout(timeout)
            .send()
            .map_err(|e| FetchError::transport(location, e))?;

        if !response.status().is_success() {
            return Err(FetchError::status(location, response.status()));
        }

        let bytes = response
            .bytes()
            .map_err(|e| FetchError::transport(location, e))?;
        log::debug!("Downloaded {} bytes from {location}", bytes.len());
        Ok(bytes.to_vec())
    }
}

impl DocumentSource for HttpSource {
    fn fetch_text(&self, location: &str) -> Result<String, FetchError> {
        let bytes = self.fetch_bytes(location, self.playlist_timeout)?;
        Ok(decode_text(&bytes))
    }

    fn fetch_gzip_text(&self, location: &str) -> Result<String, FetchError> {
        let bytes = self.fetch_bytes(location, self.guide_timeout)?;
        decode_gzip_text(&bytes, location)
    }
}

/// Filesystem path for a location, or `None` if it must be downloaded.
pub fn local_path(location: &str) -> Option<PathBuf> {
    let lower = location.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return None;
    }
    let path = location.strip_prefix("file://").unwrap_or(location);
    Some(PathBuf::from(path))
}

/// Lossy UTF-8 decoding.
pub fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Decompress gzip data (all members) and decode it as lossy UTF-8.
///
/// `location` is only used in the error.
pub fn decode_gzip_text(bytes: &[u8], location: &str) -> Result<String, FetchError> {
    let mut raw = Vec::with_capacity(bytes.len().saturating_mul(8));
    MultiGzDecoder::new(bytes)
        .read_to_end(&mut raw)
        .map_err(|e| FetchError::decompress(location, e))?;
    Ok(decode_text(&raw))
}

#[cfg(test)]
#[path = "tests/fetch_tests.rs"]
mod tests;
