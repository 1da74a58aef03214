//! Loading of period-of-record CSV bytes from disk or over HTTP.
//!
//! This sits in front of the summary worker; the pipeline itself never
//! performs I/O.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use tracing::debug;

/// Downloads `url` and returns the response body.
///
/// Non-success status codes are errors.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Reads a local file, or fetches the location over HTTP when it looks like
/// a URL.
#[tracing::instrument(fields(source = %location))]
pub async fn load_source(location: &str) -> Result<Vec<u8>> {
    let bytes = if location.starts_with("http") {
        let client = BasicClient::new();
        fetch_bytes(&client, location)
            .await
            .with_context(|| format!("fetching {location}"))?
    } else {
        tokio::fs::read(location)
            .await
            .with_context(|| format!("reading {location}"))?
    };
    debug!(bytes = bytes.len(), "Source loaded");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[tokio::test]
    async fn test_load_source_reads_local_file() {
        let path = format!("{}/por_summary_test_source.csv", env::temp_dir().display());
        fs::write(&path, "Provider\nNWIS\n").unwrap();

        let bytes = load_source(&path).await.unwrap();
        assert_eq!(bytes, b"Provider\nNWIS\n");

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_load_source_missing_file_errors() {
        assert!(load_source("/nonexistent/por_summary.csv").await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_bytes_rejects_invalid_url() {
        let client = BasicClient::new();
        assert!(fetch_bytes(&client, "not a url").await.is_err());
    }
}
