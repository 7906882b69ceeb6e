use crate::vectorizer::DocVector;
use crate::RowId;

/// Dense, symmetric N×N cosine similarity matrix stored row-major.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    n: usize,
    scores: Vec<f32>,
}

impl SimilarityMatrix {
    /// Pairwise dot products of unit-normalized vectors. The upper triangle is
    /// computed and mirrored so that (i, j) and (j, i) are bitwise equal.
    pub fn from_vectors(vectors: &[DocVector]) -> Self {
        let n = vectors.len();
        let mut scores = vec![0.0f32; n * n];
        for i in 0..n {
            if vectors[i].is_zero() { continue; }
            for j in i..n {
                let s = vectors[i].dot(&vectors[j]);
                scores[i * n + j] = s;
                scores[j * n + i] = s;
            }
        }
        Self { n, scores }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize { self.n }

    pub fn get(&self, i: RowId, j: RowId) -> f32 { self.scores[i * self.n + j] }

    pub fn row(&self, i: RowId) -> &[f32] { &self.scores[i * self.n..(i + 1) * self.n] }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::{fit_transform, VectorizerOptions};

    fn matrix(docs: &[&str]) -> SimilarityMatrix {
        SimilarityMatrix::from_vectors(&fit_transform(docs, VectorizerOptions::default()).vectors)
    }

    #[test]
    fn symmetric_with_unit_diagonal() {
        let m = matrix(&["action thriller", "action adventure", "romance drama", "drama thriller"]);
        for i in 0..m.len() {
            assert!((m.get(i, i) - 1.0).abs() < 1e-5);
            for j in 0..m.len() {
                assert_eq!(m.get(i, j).to_bits(), m.get(j, i).to_bits());
            }
        }
    }

    #[test]
    fn disjoint_genres_score_zero() {
        let m = matrix(&["action thriller", "romance drama"]);
        assert_eq!(m.get(0, 1), 0.0);
    }

    #[test]
    fn zero_vector_row_is_all_zero() {
        let m = matrix(&["the", "drama"]);
        assert_eq!(m.row(0), &[0.0f32, 0.0][..]);
        assert_eq!(m.get(1, 0), 0.0);
    }
}
