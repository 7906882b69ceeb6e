use crate::index::SimilarityIndex;
use crate::{normalize_title, RowId};
use serde::Serialize;
use std::cmp::Ordering;

/// How the query item is kept out of its own results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelfExclusion {
    /// Drop whichever entry ranks first. A different record with an identical
    /// genre text and a lower row can take that slot, in which case the query
    /// item itself shows up in the results.
    #[default]
    Positional,
    /// Drop the query's own row before ranking.
    Identity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub top_n: usize,
    pub exclusion: SelfExclusion,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self { top_n: 5, exclusion: SelfExclusion::Positional }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// 1-based position in the result list
    pub rank: usize,
    pub title: String,
    pub score: f32,
}

/// Read-only recommendation queries against a built [`SimilarityIndex`].
#[derive(Debug, Clone)]
pub struct QueryService {
    index: SimilarityIndex,
    options: QueryOptions,
}

impl QueryService {
    pub fn new(index: SimilarityIndex) -> Self {
        Self::with_options(index, QueryOptions::default())
    }

    pub fn with_options(index: SimilarityIndex, options: QueryOptions) -> Self {
        Self { index, options }
    }

    pub fn index(&self) -> &SimilarityIndex { &self.index }

    pub fn options(&self) -> QueryOptions { self.options }

    /// [`recommend`](Self::recommend) with the configured default count.
    pub fn recommend_default(&self, query_title: &str) -> Vec<String> {
        self.recommend(query_title, self.options.top_n)
    }

    /// Titles of the `top_n` records most similar to `query_title`, best first.
    /// Unknown titles yield an empty list.
    pub fn recommend(&self, query_title: &str, top_n: usize) -> Vec<String> {
        self.recommend_scored(query_title, top_n)
            .map(|recs| recs.into_iter().map(|r| r.title).collect())
            .unwrap_or_default()
    }

    /// Like [`recommend`](Self::recommend) but keeps scores; `None` when the
    /// title is not in the index.
    pub fn recommend_scored(&self, query_title: &str, top_n: usize) -> Option<Vec<Recommendation>> {
        let Some(query_row) = self.index.row_of(query_title) else {
            tracing::debug!(query = %normalize_title(query_title), "title not found");
            return None;
        };
        let row = self.index.row(query_row);

        let mut candidates: Vec<RowId> = match self.options.exclusion {
            SelfExclusion::Positional => (0..row.len()).collect(),
            SelfExclusion::Identity => (0..row.len()).filter(|&r| r != query_row).collect(),
        };
        let skip = match self.options.exclusion {
            SelfExclusion::Positional => 1,
            SelfExclusion::Identity => 0,
        };
        let ranked = top_rows(row, &mut candidates, top_n.saturating_add(skip));

        let results = ranked
            .iter()
            .skip(skip)
            .take(top_n)
            .enumerate()
            .filter_map(|(i, &r)| {
                self.index.title(r).map(|title| Recommendation { rank: i + 1, title: title.to_string(), score: row[r] })
            })
            .collect::<Vec<_>>();
        tracing::debug!(query_row, hits = results.len(), "recommendations computed");
        Some(results)
    }
}

/// Descending score, then ascending row. Total, so a partial selection followed
/// by a sort of the prefix matches a full stable sort.
fn rank_order(scores: &[f32], a: RowId, b: RowId) -> Ordering {
    scores[b].partial_cmp(&scores[a]).unwrap_or(Ordering::Equal).then(a.cmp(&b))
}

fn top_rows<'a>(scores: &[f32], candidates: &'a mut [RowId], k: usize) -> &'a [RowId] {
    let k = k.min(candidates.len());
    if k == 0 {
        return &candidates[..0];
    }
    if k < candidates.len() {
        candidates.select_nth_unstable_by(k - 1, |&a, &b| rank_order(scores, a, b));
    }
    let prefix = &mut candidates[..k];
    prefix.sort_by(|&a, &b| rank_order(scores, a, b));
    prefix
}
