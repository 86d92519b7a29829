//! Core data models used throughout filerec.
//!
//! These types represent the corpus items and the saved-file descriptors that
//! flow through the recommendation pipeline. Field names follow the metadata
//! service's JSON (`_id`, `course`, `school`).

use serde::{Deserialize, Serialize};

/// A file known to the metadata service, described by its course and school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    #[serde(rename = "_id")]
    pub id: String,
    pub course: String,
    pub school: String,
}

/// A file the user has already saved. The id is used only to exclude the
/// file from results, never for scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedFile {
    #[serde(rename = "_id")]
    pub id: String,
    pub course: String,
    pub school: String,
}

impl FileMeta {
    /// Combined descriptor text used for similarity analysis.
    pub fn text(&self) -> String {
        format!("{} {}", self.course, self.school)
    }
}

impl SavedFile {
    /// Combined descriptor text, same shape as [`FileMeta::text`].
    pub fn text(&self) -> String {
        format!("{} {}", self.course, self.school)
    }
}

/// Request body for `POST /recommend`.
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub saved_files: Vec<SavedFile>,
}
