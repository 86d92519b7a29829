//! TF-IDF vector space fitting and projection.
//!
//! Fits a term-weighting model over the combined descriptor texts of the
//! current corpus snapshot and produces one L2-normalized row per file.
//! Queries are projected through the same fitted model, so out-of-vocabulary
//! terms simply contribute nothing.
//!
//! Tokens are lower-cased runs of alphanumerics of length ≥ 2. IDF is
//! smoothed as `ln((1 + n) / (1 + df)) + 1` so no term divides by zero.
//!
//! The vocabulary is derived solely from the corpus passed to [`TfidfModel::fit`];
//! there is no persistence or incremental update across requests.

use std::collections::{HashMap, HashSet};

use crate::error::RecError;

/// A fitted term-weighting model: vocabulary plus per-term IDF weights.
#[derive(Debug)]
pub struct TfidfModel {
    /// term → dimension index
    vocabulary: HashMap<String, usize>,
    /// IDF weight per dimension
    idf: Vec<f32>,
}

impl TfidfModel {
    /// Fit a model over the corpus texts and return it together with the
    /// weighted row matrix (one row per input text, in input order).
    ///
    /// # Errors
    ///
    /// Returns [`RecError::Computation`] for a zero-item corpus or a corpus
    /// whose texts yield no usable terms after tokenization. A degenerate
    /// space must surface as an error, never as spurious scores.
    pub fn fit(texts: &[String]) -> Result<(Self, Vec<Vec<f32>>), RecError> {
        if texts.is_empty() {
            return Err(RecError::Computation("corpus is empty".to_string()));
        }

        let tokenized: Vec<Vec<String>> = texts.iter().map(|t| tokenize(t)).collect();

        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for tokens in &tokenized {
            let unique: HashSet<&str> = tokens.iter().map(|t| t.as_str()).collect();
            for term in unique {
                *doc_freq.entry(term.to_string()).or_insert(0) += 1;
                if !vocabulary.contains_key(term) {
                    let idx = vocabulary.len();
                    vocabulary.insert(term.to_string(), idx);
                }
            }
        }

        if vocabulary.is_empty() {
            return Err(RecError::Computation(
                "corpus has no usable terms after tokenization".to_string(),
            ));
        }

        let n = texts.len() as f32;
        let mut idf = vec![0.0f32; vocabulary.len()];
        for (term, &idx) in &vocabulary {
            let df = *doc_freq.get(term).unwrap_or(&0) as f32;
            idf[idx] = ((1.0 + n) / (1.0 + df)).ln() + 1.0;
        }

        let model = Self { vocabulary, idf };
        let rows: Vec<Vec<f32>> = tokenized
            .iter()
            .map(|tokens| model.transform_tokens(tokens))
            .collect();

        Ok((model, rows))
    }

    /// Project a text into the fitted space. Unknown terms are dropped.
    pub fn transform(&self, text: &str) -> Vec<f32> {
        self.transform_tokens(&tokenize(text))
    }

    /// Vocabulary size (matrix column count).
    pub fn dims(&self) -> usize {
        self.idf.len()
    }

    fn transform_tokens(&self, tokens: &[String]) -> Vec<f32> {
        let mut tf: HashMap<&str, f32> = HashMap::new();
        for token in tokens {
            *tf.entry(token.as_str()).or_insert(0.0) += 1.0;
        }

        let mut vector = vec![0.0f32; self.dims()];
        for (term, &count) in &tf {
            if let Some(&idx) = self.vocabulary.get(*term) {
                vector[idx] = count * self.idf[idx];
            }
        }

        normalize(&mut vector);
        vector
    }
}

/// Tokenize text: lowercase, split on non-alphanumeric, keep tokens of
/// two or more characters (characters, not bytes, so accented single
/// letters are still dropped).
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > 1)
        .map(|w| w.to_string())
        .collect()
}

/// Normalize a vector to unit length (in-place). Zero vectors stay zero.
fn normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns a value in `[-1.0, 1.0]`; with non-negative TF-IDF weights the
/// effective range is `[0.0, 1.0]`. Returns `0.0` for empty vectors or
/// vectors of different lengths.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    dot / denom
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fit(texts: &[&str]) -> (TfidfModel, Vec<Vec<f32>>) {
        let owned: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
        TfidfModel::fit(&owned).unwrap()
    }

    #[test]
    fn test_fit_builds_vocabulary() {
        let (model, rows) = fit(&["Algorithms MIT", "Art History MIT"]);
        assert!(model.dims() > 0);
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.len(), model.dims());
        }
    }

    #[test]
    fn test_rows_are_unit_length() {
        let (_, rows) = fit(&["Algorithms MIT", "Databases Stanford"]);
        for row in &rows {
            let norm: f32 = row.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5, "row norm was {}", norm);
        }
    }

    #[test]
    fn test_self_similarity_is_maximal() {
        let (model, rows) = fit(&["Algorithms MIT", "Algorithms Stanford", "Art History MIT"]);
        let query = model.transform("Algorithms MIT");
        let sims: Vec<f32> = rows.iter().map(|r| cosine_similarity(&query, r)).collect();
        assert!((sims[0] - 1.0).abs() < 1e-5);
        assert!(sims[0] >= sims[1]);
        assert!(sims[1] > sims[2]);
    }

    #[test]
    fn test_transform_is_case_insensitive() {
        let (model, _) = fit(&["Algorithms MIT", "Art History Stanford"]);
        assert_eq!(model.transform("ALGORITHMS mit"), model.transform("algorithms MIT"));
    }

    #[test]
    fn test_unknown_terms_give_zero_vector() {
        let (model, _) = fit(&["Algorithms MIT"]);
        let vector = model.transform("quantum basketweaving");
        assert!(vector.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_rare_term_outweighs_common_term() {
        // "mit" appears in every document, "databases" in one: the shared
        // term must carry less weight in the matching row.
        let (model, rows) = fit(&["Algorithms MIT", "Databases MIT", "Art History MIT"]);
        let db_idx = *model.vocabulary.get("databases").unwrap();
        let mit_idx = *model.vocabulary.get("mit").unwrap();
        assert!(rows[1][db_idx] > rows[1][mit_idx]);
    }

    #[test]
    fn test_empty_corpus_is_an_error() {
        let err = TfidfModel::fit(&[]).unwrap_err();
        assert!(matches!(err, RecError::Computation(_)));
    }

    #[test]
    fn test_single_character_tokens_dropped_by_chars_not_bytes() {
        // "é" is one character (two bytes) and must be dropped like "a";
        // "éé" is a real token.
        let err = TfidfModel::fit(&["é û".to_string()]).unwrap_err();
        assert!(matches!(err, RecError::Computation(_)));

        let (model, _) = fit(&["éé MIT"]);
        assert!(model.transform("éé").iter().any(|&v| v > 0.0));
    }

    #[test]
    fn test_all_empty_texts_is_an_error() {
        let texts = vec![String::new(), " ".to_string(), "a".to_string()];
        let err = TfidfModel::fit(&texts).unwrap_err();
        assert!(matches!(err, RecError::Computation(_)));
    }

    #[test]
    fn test_cosine_identical() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_empty_and_mismatched() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
    }
}
