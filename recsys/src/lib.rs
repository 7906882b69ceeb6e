//! Genre-based title recommendations.
//!
//! Records are vectorized with TF-IDF over their genre text, compared with
//! cosine similarity into a dense matrix, and queried for the closest titles.

pub mod error;
pub mod index;
pub mod loader;
pub mod query;
mod similarity;
pub mod tokenizer;
mod vectorizer;

use serde::{Deserialize, Serialize};

pub use error::{LoadError, RecsysError, Result};
pub use index::SimilarityIndex;
pub use loader::{load_index, load_records, Columns, LoadedDataset};
pub use query::{QueryOptions, QueryService, Recommendation, SelfExclusion};
pub use vectorizer::VectorizerOptions;

pub type TermId = u32;
/// Position of a record in the similarity matrix.
pub type RowId = usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    pub genre_text: String,
}

impl Record {
    pub fn new(title: impl Into<String>, genre_text: impl Into<String>) -> Self {
        Self { title: title.into(), genre_text: genre_text.into() }
    }
}

/// Key used for title lookups: trimmed and lower-cased.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}
