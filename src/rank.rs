//! Cosine-similarity ranking over the fitted vector space.
//!
//! Projects each saved file's combined text through the same fitted model
//! used for the corpus, averages the projections into a single query vector,
//! scores every corpus row, and selects the best unseen files.

use std::collections::HashSet;

use crate::error::RecError;
use crate::models::{FileMeta, SavedFile};
use crate::tfidf::{cosine_similarity, TfidfModel};

/// Rank the corpus against a saved-file query and return the best matches.
///
/// Scores are sorted descending; ties keep the original corpus row order
/// (the sort is stable). Files whose id appears in `exclude_ids` are skipped
/// during the sorted walk, so exclusion never shrinks the candidate pool
/// before ranking. At most `top_k` files are returned; a short result is not
/// an error.
///
/// # Errors
///
/// Returns [`RecError::Computation`] if the fitted space is empty or the row
/// matrix does not match the corpus.
pub fn rank(
    saved: &[SavedFile],
    model: &TfidfModel,
    rows: &[Vec<f32>],
    corpus: &[FileMeta],
    exclude_ids: &HashSet<String>,
    top_k: usize,
) -> Result<Vec<FileMeta>, RecError> {
    if model.dims() == 0 || rows.is_empty() {
        return Err(RecError::Computation(
            "vector space is empty".to_string(),
        ));
    }
    if rows.len() != corpus.len() {
        return Err(RecError::Computation(format!(
            "row matrix has {} rows for {} corpus files",
            rows.len(),
            corpus.len()
        )));
    }

    let query = mean_query_vector(saved, model)?;

    let mut scores: Vec<(usize, f32)> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| (i, cosine_similarity(&query, row)))
        .collect();

    // Stable sort: equal scores preserve corpus row order.
    scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut results = Vec::with_capacity(top_k);
    for (i, _) in scores {
        if exclude_ids.contains(&corpus[i].id) {
            continue;
        }
        results.push(corpus[i].clone());
        if results.len() == top_k {
            break;
        }
    }

    Ok(results)
}

/// Average the per-descriptor projections into one query vector.
///
/// Every saved file counts equally; there is no recency or frequency
/// weighting.
fn mean_query_vector(saved: &[SavedFile], model: &TfidfModel) -> Result<Vec<f32>, RecError> {
    if saved.is_empty() {
        return Err(RecError::InvalidQuery(
            "no saved files to rank against".to_string(),
        ));
    }

    let mut sum = vec![0.0f32; model.dims()];
    for file in saved {
        let vector = model.transform(&file.text());
        for (acc, v) in sum.iter_mut().zip(vector.iter()) {
            *acc += v;
        }
    }

    let n = saved.len() as f32;
    for v in sum.iter_mut() {
        *v /= n;
    }

    Ok(sum)
}
