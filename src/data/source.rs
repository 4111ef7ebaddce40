//! Where the daily CSV comes from: a local file or a single HTTP(S) fetch.

use std::fmt;
use std::path::PathBuf;

use reqwest::blocking::Client;
use tracing::info;

use crate::error::AppError;

/// Default file name looked up in the working directory.
pub const DEFAULT_DATA_FILE: &str = "temperature_daily.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// Interpret a `--data` argument. `http://` and `https://` prefixes select a
    /// remote fetch; anything else is a filesystem path.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::File(PathBuf::from(trimmed))
        }
    }

    /// Read the whole source into memory.
    pub fn fetch(&self) -> Result<Vec<u8>, AppError> {
        match self {
            DataSource::File(path) => {
                let bytes = std::fs::read(path).map_err(|e| {
                    AppError::data_unavailable(format!("failed to read '{}': {e}", path.display()))
                })?;
                info!(path = %path.display(), bytes = bytes.len(), "read data file");
                Ok(bytes)
            }
            DataSource::Url(url) => fetch_url(url),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => write!(f, "{url}"),
        }
    }
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::File(PathBuf::from(DEFAULT_DATA_FILE))
    }
}

fn fetch_url(url: &str) -> Result<Vec<u8>, AppError> {
    let client = Client::new();
    let response = client
        .get(url)
        .send()
        .map_err(|e| AppError::data_unavailable(format!("request to {url} failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::data_unavailable(format!("{url} returned HTTP {status}")));
    }

    let bytes = response
        .bytes()
        .map_err(|e| AppError::data_unavailable(format!("failed to read body of {url}: {e}")))?;
    info!(%url, bytes = bytes.len(), "fetched data");
    Ok(bytes.to_vec())
}
