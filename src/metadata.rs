//! Corpus snapshot loading from the metadata service.
//!
//! Defines the [`CorpusSource`] trait and the HTTP implementation that
//! fetches `GET {base_url}/file/metadata`. The core treats the snapshot as
//! immutable for one computation and does not cache it; staleness is the
//! metadata service's concern.
//!
//! # Retry Strategy
//!
//! Transient failures use exponential backoff:
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

use async_trait::async_trait;
use std::time::Duration;

use crate::config::MetadataConfig;
use crate::error::RecError;
use crate::models::FileMeta;

/// A source of the full current corpus snapshot.
///
/// Every returned file must carry a non-empty id, course, and school; a
/// record missing any of them makes the whole snapshot unusable.
#[async_trait]
pub trait CorpusSource: Send + Sync {
    async fn load(&self) -> Result<Vec<FileMeta>, RecError>;
}

/// Corpus source backed by the metadata service's HTTP API.
pub struct HttpMetadataSource {
    client: reqwest::Client,
    url: String,
    max_retries: u32,
}

impl HttpMetadataSource {
    pub fn new(config: &MetadataConfig) -> Result<Self, RecError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RecError::Unavailable(format!("failed to build HTTP client: {}", e)))?;

        let url = format!("{}/file/metadata", config.base_url.trim_end_matches('/'));

        Ok(Self {
            client,
            url,
            max_retries: config.max_retries,
        })
    }
}

#[async_trait]
impl CorpusSource for HttpMetadataSource {
    async fn load(&self) -> Result<Vec<FileMeta>, RecError> {
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s, 8s, ...
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            let resp = self.client.get(&self.url).send().await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return response.json::<Vec<FileMeta>>().await.map_err(|e| {
                            RecError::Unavailable(format!(
                                "metadata response was not parseable: {}",
                                e
                            ))
                        });
                    }

                    // Rate limited or server error — retry
                    if status.as_u16() == 429 || status.is_server_error() {
                        let body = response.text().await.unwrap_or_default();
                        last_err = Some(RecError::Unavailable(format!(
                            "metadata service error {}: {}",
                            status, body
                        )));
                        continue;
                    }

                    // Client error (not 429) — don't retry
                    let body = response.text().await.unwrap_or_default();
                    return Err(RecError::Unavailable(format!(
                        "metadata service error {}: {}",
                        status, body
                    )));
                }
                Err(e) => {
                    last_err = Some(RecError::Unavailable(format!(
                        "metadata request failed: {}",
                        e
                    )));
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            RecError::Unavailable("metadata fetch failed after retries".to_string())
        }))
    }
}
