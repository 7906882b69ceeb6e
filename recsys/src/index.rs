use crate::error::{RecsysError, Result};
use crate::similarity::SimilarityMatrix;
use crate::vectorizer::{fit_transform, VectorizerOptions};
use crate::{normalize_title, Record, RowId};
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// Immutable similarity index over a fixed snapshot of records.
///
/// Holds the similarity matrix, the display title of every row and the
/// normalized title lookup. Vocabulary and document vectors are dropped once
/// the matrix is built.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    matrix: SimilarityMatrix,
    titles: Vec<String>,
    /// Normalized title -> row. Inserting an existing key overwrites its row
    /// (last write wins) but keeps the key's first-seen position.
    title_index: IndexMap<String, RowId>,
    vocabulary_len: usize,
}

impl SimilarityIndex {
    pub fn build(records: &[Record]) -> Result<Self> {
        Self::build_with(records, VectorizerOptions::default())
    }

    pub fn build_with(records: &[Record], options: VectorizerOptions) -> Result<Self> {
        if records.is_empty() {
            return Err(RecsysError::EmptyDataset);
        }

        let genres: Vec<&str> = records.iter().map(|r| r.genre_text.as_str()).collect();
        let tfidf = fit_transform(&genres, options);
        let matrix = SimilarityMatrix::from_vectors(&tfidf.vectors);

        let mut title_index: IndexMap<String, RowId> = IndexMap::with_capacity(records.len());
        for (row, record) in records.iter().enumerate() {
            title_index.insert(normalize_title(&record.title), row);
        }
        let titles = records.iter().map(|r| r.title.clone()).collect();

        tracing::info!(
            records = records.len(),
            distinct_titles = title_index.len(),
            vocabulary = tfidf.vocabulary.len(),
            "similarity index built"
        );
        Ok(Self { matrix, titles, title_index, vocabulary_len: tfidf.vocabulary.len() })
    }

    pub fn len(&self) -> usize { self.titles.len() }

    pub fn is_empty(&self) -> bool { self.titles.is_empty() }

    pub fn vocabulary_len(&self) -> usize { self.vocabulary_len }

    pub fn title(&self, row: RowId) -> Option<&str> { self.titles.get(row).map(String::as_str) }

    /// Row for a title, matched after trimming and lowercasing.
    pub fn row_of(&self, title: &str) -> Option<RowId> {
        self.title_index.get(&normalize_title(title)).copied()
    }

    pub fn similarity(&self, i: RowId, j: RowId) -> f32 { self.matrix.get(i, j) }

    pub fn row(&self, i: RowId) -> &[f32] { self.matrix.row(i) }

    /// Sorted distinct display titles, suitable for a picker.
    pub fn titles(&self) -> Vec<String> {
        self.titles.iter().cloned().collect::<BTreeSet<_>>().into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(SimilarityIndex::build(&[]), Err(RecsysError::EmptyDataset)));
    }

    #[test]
    fn duplicate_titles_resolve_to_last_row() {
        let records = vec![
            Record::new("X", "action"),
            Record::new("Y", "drama"),
            Record::new(" x ", "romance"),
        ];
        let index = SimilarityIndex::build(&records).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.row_of("X"), Some(2));
        assert_eq!(index.row_of("y"), Some(1));
    }

    #[test]
    fn every_key_maps_to_a_valid_row() {
        let records = vec![Record::new("A", "comedy"), Record::new("B", "comedy drama")];
        let index = SimilarityIndex::build(&records).unwrap();
        for record in &records {
            let row = index.row_of(&record.title).unwrap();
            assert!(row < index.len());
        }
        assert_eq!(index.vocabulary_len(), 2);
    }

    #[test]
    fn unsmoothed_idf_still_ranks_shared_terms() {
        let records = vec![
            Record::new("A", "action thriller"),
            Record::new("B", "action adventure"),
            Record::new("C", "romance drama"),
        ];
        let options = VectorizerOptions { smooth_idf: false, sublinear_tf: true };
        let index = SimilarityIndex::build_with(&records, options).unwrap();
        assert!(index.similarity(0, 1) > index.similarity(0, 2));
        assert_eq!(index.similarity(0, 2), 0.0);
    }

    #[test]
    fn listing_is_sorted_and_distinct() {
        let records = vec![
            Record::new("Zed", "action"),
            Record::new("Alpha", "drama"),
            Record::new("Zed", "comedy"),
        ];
        let index = SimilarityIndex::build(&records).unwrap();
        assert_eq!(index.titles(), vec!["Alpha".to_string(), "Zed".to_string()]);
    }
}
