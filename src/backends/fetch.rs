//! Fetch backend - resolves a source locator into document text
//!
//! Locators starting with http:// or https:// are fetched over HTTP with
//! a blocking client; anything else is read from the filesystem.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::core::util::get_file_size;

/// Fetch failure kinds
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no source given")]
    MissingSource,

    #[error("request for {url} failed with status {status}")]
    Http { url: String, status: u16 },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A fetched document
#[derive(Debug, Clone)]
pub struct Fetched {
    /// Raw document text
    pub text: String,

    /// Size in bytes, when known
    pub size: Option<u64>,
}

/// Whether a locator should be fetched over HTTP
pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Fetch the document text behind a locator
pub fn fetch_source(source: &str) -> Result<Fetched, FetchError> {
    if source.is_empty() {
        return Err(FetchError::MissingSource);
    }

    if is_url(source) {
        fetch_url(source)
    } else {
        fetch_file(source)
    }
}

fn fetch_url(url: &str) -> Result<Fetched, FetchError> {
    let response = reqwest::blocking::Client::new().get(url).send()?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Http {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let size = response.content_length();
    let text = response.text()?;
    let size = size.or(Some(text.len() as u64));

    Ok(Fetched { text, size })
}

fn fetch_file(path: &str) -> Result<Fetched, FetchError> {
    let size = get_file_size(Path::new(path)).ok();
    let text = fs::read_to_string(path).map_err(|source| FetchError::Io {
        path: path.to_string(),
        source,
    })?;

    Ok(Fetched { text, size })
}
