//! Media byte retrieval.
//!
//! Slides and audio tracks reference plain HTTP(S) URLs; there is no
//! bespoke wire protocol. The fetcher is a trait so the waveform and
//! probe paths are testable without a network.

use std::future::Future;

use concepto_core::{ConceptoError, Result};

/// Retrieves raw media bytes for a URL.
pub trait MediaFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Plain-GET fetcher over reqwest.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MediaFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ConceptoError::Fetch(format!("GET {}: {}", url, e)))?
            .error_for_status()
            .map_err(|e| ConceptoError::Fetch(format!("GET {}: {}", url, e)))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ConceptoError::Fetch(format!("reading body of {}: {}", url, e)))?;

        Ok(bytes.to_vec())
    }
}
