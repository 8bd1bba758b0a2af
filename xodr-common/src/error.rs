//! Error types and utilities for the xodr-graph toolkit
//!
//! Provides the shared error type and fuzzy matching of free-form names
//! (lane types, lane categories) against a known vocabulary.

use std::path::PathBuf;
use strsim::{jaro_winkler, normalized_levenshtein};

/// Minimum combined similarity for a candidate to be suggested.
///
/// Lane type names are short camel-case words ("driving", "onRamp"), so the
/// threshold is the same one that separates typos from unrelated words for
/// region names.
const MIN_SIMILARITY: f64 = 0.65;

/// Find the best fuzzy match using character-based scoring
///
/// Combines Jaro-Winkler (70%) and normalized Levenshtein (30%), with a bonus
/// for a strong shared prefix. Comparison is case-insensitive.
fn find_best_fuzzy_match<'a, I>(input: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let input_lower = input.to_lowercase();
    let mut best_match = None;
    let mut best_score = 0.0f64;

    for candidate in candidates {
        let candidate_lower = candidate.to_lowercase();

        // Jaro-Winkler: transpositions and prefix typos ("drivnig" -> "driving").
        let jw_score = jaro_winkler(&input_lower, &candidate_lower);

        // Normalized Levenshtein: insertions/deletions ("sidwalk" -> "sidewalk").
        let lev_score = normalized_levenshtein(&input_lower, &candidate_lower);

        let mut score = (jw_score * 0.7) + (lev_score * 0.3);

        // Prefix bonus (+20% max) on the first 5 characters
        let prefix_len = input_lower.chars().count().min(5);
        if prefix_len >= 4 {
            let input_prefix: String = input_lower.chars().take(prefix_len).collect();
            let candidate_prefix: String = candidate_lower.chars().take(prefix_len).collect();

            let prefix_similarity = normalized_levenshtein(&input_prefix, &candidate_prefix);
            if prefix_similarity > 0.7 {
                score += 0.2 * prefix_similarity;
            }
        }

        if score >= MIN_SIMILARITY && score > best_score {
            best_score = score;
            best_match = Some(candidate);
        }
    }

    best_match
}

/// Suggest a correction for a name that is not part of `vocabulary`
///
/// Returns `None` when the name is already valid (case-insensitively) or when
/// nothing in the vocabulary is similar enough.
pub fn suggest_correction<'a>(name: &str, vocabulary: &[&'a str]) -> Option<&'a str> {
    if vocabulary.iter().any(|valid| valid.eq_ignore_ascii_case(name)) {
        return None;
    }

    find_best_fuzzy_match(name, vocabulary.iter().copied())
}

/// Main error type for xodr-graph operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File could not be read or written
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not well-formed XML
    #[error("Failed to parse '{document}': {message}")]
    Parse { document: String, message: String },

    /// Invalid parameters (lane category, traversal start, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Malformed configuration file
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Attach a path to an I/O error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience result type for xodr-graph operations
pub type Result<T> = std::result::Result<T, Error>;
