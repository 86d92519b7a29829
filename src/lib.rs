//! # filerec
//!
//! A cached TF-IDF recommendation service for shared study files.
//!
//! filerec ranks the files known to a metadata service by textual similarity
//! to the files a user has already saved, and returns the top matches the
//! user does not hold yet. Results are memoized under an order- and
//! case-independent key so repeated queries skip the corpus fetch and refit.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌────────────┐   ┌─────────────────┐
//! │ HTTP/CLI │──▶│   Engine    │──▶│ Metadata source │
//! └──────────┘   │ key → cache│   │ (GET snapshot)  │
//!                │ → fit→rank │   └─────────────────┘
//!                └─────┬──────┘
//!                      ▼
//!                ┌────────────┐
//!                │ Cache (TTL)│
//!                └────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! filerec serve                          # start the HTTP API
//! filerec recommend --input saved.json   # one-shot ranking from the CLI
//! filerec corpus                         # fetch and print the corpus snapshot
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`error`] | Error taxonomy |
//! | [`models`] | Core data types |
//! | [`canonical`] | Order/case-invariant cache keys |
//! | [`metadata`] | Corpus snapshot loading |
//! | [`tfidf`] | TF-IDF vector space fitting |
//! | [`rank`] | Cosine-similarity ranking |
//! | [`cache`] | Result cache stores |
//! | [`engine`] | Recommendation pipeline |
//! | [`server`] | JSON HTTP server |

pub mod cache;
pub mod canonical;
pub mod config;
pub mod engine;
pub mod error;
pub mod metadata;
pub mod models;
pub mod rank;
pub mod server;
pub mod tfidf;
