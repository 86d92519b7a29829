//! Error taxonomy for the recommendation engine.
//!
//! The three fatal kinds ([`RecError::InvalidQuery`], [`RecError::Unavailable`],
//! [`RecError::Computation`]) abort a request and surface to callers as
//! distinct failure categories. [`RecError::CacheUnavailable`] is non-fatal:
//! the engine logs it and proceeds uncached, so it never reaches a caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecError {
    /// A saved-file descriptor is missing a required field.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The metadata service could not be reached or returned unparseable data.
    #[error("metadata service unavailable: {0}")]
    Unavailable(String),

    /// The corpus yields an empty or degenerate vector space.
    #[error("similarity computation failed: {0}")]
    Computation(String),

    /// The cache store failed; the request proceeds without caching.
    #[error("cache unavailable: {0}")]
    CacheUnavailable(String),
}
