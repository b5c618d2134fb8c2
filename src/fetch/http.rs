// src/fetch/http.rs

use bytes::Bytes;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::debug;
use url::Url;

use super::TripSource;
use crate::error::{IngestError, Result};

/// Reads trip files with plain unauthenticated GETs under a base location.
///
/// Timeouts and connection handling are reqwest's defaults; nothing is
/// retried here.
pub struct HttpTripSource {
    client: Client,
    base_url: Url,
}

impl HttpTripSource {
    pub fn new(base_url: Url) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// `{base_url}/{object}`, with `object` appended as a single path segment.
    pub fn object_url(&self, object: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(object);
        }
        url
    }
}

impl TripSource for HttpTripSource {
    fn fetch(&self, object: &str) -> Result<Option<Bytes>> {
        let url = self.object_url(object);

        let resp = self
            .client
            .get(url.as_str())
            .send()
            .map_err(|source| IngestError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        debug!(url = %url, status = %status, "response");
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(IngestError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = resp.bytes().map_err(|source| IngestError::Transport {
            url: url.to_string(),
            source,
        })?;
        Ok(Some(body))
    }
}
