//! Recommendation pipeline orchestration.
//!
//! Coordinates the full flow: canonical key → cache lookup → corpus load →
//! TF-IDF fit → cosine ranking → cache store. The cache-free compute path is
//! exposed separately ([`Engine::compute`]) so ranking behavior can be
//! exercised without a cache in front of it.
//!
//! The engine holds no mutable state of its own and is stateless between
//! requests: every cache miss reloads the corpus and refits the vector space
//! from that snapshot. Cache failures degrade to "compute, return, skip
//! caching" and are never surfaced to the caller.

use std::collections::HashSet;
use std::time::Duration;

use crate::cache::CacheStore;
use crate::canonical;
use crate::config::Config;
use crate::error::RecError;
use crate::metadata::CorpusSource;
use crate::models::{FileMeta, SavedFile};
use crate::rank;
use crate::tfidf::TfidfModel;

/// The recommendation engine, constructed once at startup and shared by all
/// request handlers.
pub struct Engine {
    top_k: usize,
    ttl: Duration,
    key_prefix: String,
    source: Box<dyn CorpusSource>,
    cache: Box<dyn CacheStore>,
}

impl Engine {
    pub fn new(config: &Config, source: Box<dyn CorpusSource>, cache: Box<dyn CacheStore>) -> Self {
        Self {
            top_k: config.ranking.top_k,
            ttl: Duration::from_secs(config.cache.ttl_secs),
            key_prefix: config.cache.key_prefix.clone(),
            source,
            cache,
        }
    }

    /// Recommend up to top-K files similar to the user's saved files.
    ///
    /// An empty query returns an empty result immediately, touching neither
    /// the cache nor the metadata service. Otherwise the cache is consulted
    /// under the canonical key; a hit returns the stored result verbatim,
    /// and a miss runs the full compute path and stores the outcome.
    ///
    /// # Errors
    ///
    /// - [`RecError::InvalidQuery`] — a saved file is missing a field.
    /// - [`RecError::Unavailable`] — the metadata service failed.
    /// - [`RecError::Computation`] — the corpus yields a degenerate space.
    pub async fn recommend(&self, saved: &[SavedFile]) -> Result<Vec<FileMeta>, RecError> {
        if saved.is_empty() {
            return Ok(Vec::new());
        }
        validate_query(saved)?;

        let key = format!("{}{}", self.key_prefix, canonical::cache_key(saved));

        match self.cache.get(&key).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<Vec<FileMeta>>(&bytes) {
                Ok(results) => {
                    tracing::debug!(key = %key, "cache hit");
                    return Ok(results);
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "ignoring undecodable cache entry");
                }
            },
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "cache read failed; computing uncached");
            }
        }

        let results = self.compute(saved).await?;

        match serde_json::to_vec(&results) {
            Ok(bytes) => {
                if let Err(e) = self.cache.put(&key, bytes, self.ttl).await {
                    tracing::warn!(error = %e, "cache write failed; result not cached");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "result not serializable for caching");
            }
        }

        Ok(results)
    }

    /// The cache-free compute path: load the corpus, fit the vector space,
    /// rank, and select.
    pub async fn compute(&self, saved: &[SavedFile]) -> Result<Vec<FileMeta>, RecError> {
        let corpus = self.source.load().await?;
        let texts: Vec<String> = corpus.iter().map(FileMeta::text).collect();
        let (model, rows) = TfidfModel::fit(&texts)?;

        let exclude_ids: HashSet<String> = saved.iter().map(|f| f.id.clone()).collect();
        rank::rank(saved, &model, &rows, &corpus, &exclude_ids, self.top_k)
    }
}

/// Reject descriptors with blank required fields before any corpus work.
fn validate_query(saved: &[SavedFile]) -> Result<(), RecError> {
    for (i, file) in saved.iter().enumerate() {
        if file.id.trim().is_empty() {
            return Err(RecError::InvalidQuery(format!(
                "saved file at index {} has an empty _id",
                i
            )));
        }
        if file.course.trim().is_empty() || file.school.trim().is_empty() {
            return Err(RecError::InvalidQuery(format!(
                "saved file at index {} is missing course or school",
                i
            )));
        }
    }
    Ok(())
}
