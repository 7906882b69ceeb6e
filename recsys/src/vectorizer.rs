use crate::tokenizer::tokenize;
use crate::TermId;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorizerOptions {
    /// Use smoothed IDF = ln((1 + n) / (1 + df)) + 1 instead of ln(n / df) + 1
    pub smooth_idf: bool,
    /// Use 1 + ln(tf) instead of the raw term count
    pub sublinear_tf: bool,
}

impl Default for VectorizerOptions {
    fn default() -> Self {
        Self { smooth_idf: true, sublinear_tf: false }
    }
}

/// Token to column mapping. Ids follow lexicographic token order.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: HashMap<String, TermId>,
}

impl Vocabulary {
    pub fn len(&self) -> usize { self.terms.len() }
    #[cfg(test)]
    pub fn get(&self, term: &str) -> Option<TermId> { self.terms.get(term).copied() }
}

/// Sparse, L2-normalized TF-IDF vector. Entries are sorted by term id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocVector {
    entries: Vec<(TermId, f32)>,
}

impl DocVector {
    #[cfg(test)]
    pub fn entries(&self) -> &[(TermId, f32)] { &self.entries }

    pub fn is_zero(&self) -> bool { self.entries.is_empty() }

    #[cfg(test)]
    pub fn weight(&self, term: TermId) -> f32 {
        self.entries
            .binary_search_by_key(&term, |&(t, _)| t)
            .map(|i| self.entries[i].1)
            .unwrap_or(0.0)
    }

    /// Merge-join dot product; equals cosine similarity for unit vectors.
    pub fn dot(&self, other: &DocVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut acc = 0.0f32;
        while i < self.entries.len() && j < other.entries.len() {
            let (ta, wa) = self.entries[i];
            let (tb, wb) = other.entries[j];
            match ta.cmp(&tb) {
                Ordering::Equal => {
                    acc += wa * wb;
                    i += 1;
                    j += 1;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
            }
        }
        acc
    }
}

pub struct TfIdf {
    pub vocabulary: Vocabulary,
    pub vectors: Vec<DocVector>,
}

/// Learn the vocabulary and IDF weights from `docs` and vectorize each of them.
pub fn fit_transform<S: AsRef<str>>(docs: &[S], options: VectorizerOptions) -> TfIdf {
    let tokenized: Vec<Vec<String>> = docs.iter().map(|d| tokenize(d.as_ref())).collect();

    let all_terms: BTreeSet<&str> = tokenized.iter().flatten().map(String::as_str).collect();
    let terms: HashMap<String, TermId> = all_terms
        .into_iter()
        .enumerate()
        .map(|(id, term)| (term.to_string(), id as TermId))
        .collect();

    let mut df: Vec<u32> = vec![0; terms.len()];
    let mut tf_counts: Vec<BTreeMap<TermId, u32>> = Vec::with_capacity(tokenized.len());
    for tokens in &tokenized {
        let mut counts: BTreeMap<TermId, u32> = BTreeMap::new();
        let mut seen_in_doc: HashSet<TermId> = HashSet::new();
        for term in tokens {
            let tid = terms[term.as_str()];
            *counts.entry(tid).or_insert(0) += 1;
            if seen_in_doc.insert(tid) {
                df[tid as usize] += 1;
            }
        }
        tf_counts.push(counts);
    }

    let n = tokenized.len() as f32;
    let idf: Vec<f32> = df
        .iter()
        .map(|&df_t| {
            let df_t = df_t as f32;
            if options.smooth_idf { ((1.0 + n) / (1.0 + df_t)).ln() + 1.0 } else { (n / df_t.max(1.0)).ln() + 1.0 }
        })
        .collect();

    let vectors = tf_counts
        .into_iter()
        .map(|counts| {
            let mut entries: Vec<(TermId, f32)> = counts
                .into_iter()
                .map(|(tid, tf_raw)| {
                    let tf = if options.sublinear_tf { 1.0 + (tf_raw as f32).ln() } else { tf_raw as f32 };
                    (tid, tf * idf[tid as usize])
                })
                .collect();
            let norm = entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
            if norm == 0.0 {
                entries.clear();
            } else {
                for (_, w) in entries.iter_mut() { *w /= norm; }
            }
            DocVector { entries }
        })
        .collect();

    TfIdf { vocabulary: Vocabulary { terms }, vectors }
}
