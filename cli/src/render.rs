use recsys::Recommendation;

pub const NO_SELECTION: &str = "Please select a movie title.";
pub const NOT_FOUND: &str = "Movie not found in dataset.";

/// Text shown for one pick: a numbered list, or the not-found message when
/// the title is not in the dataset (`None`).
pub fn render(selected: &str, results: Option<&[Recommendation]>, with_scores: bool) -> String {
    let Some(results) = results else {
        return NOT_FOUND.to_string();
    };
    let mut out = format!("Recommendations for '{selected}':\n\n");
    for rec in results {
        if with_scores {
            out.push_str(&format!("{}. {} ({:.3})\n", rec.rank, rec.title, rec.score));
        } else {
            out.push_str(&format!("{}. {}\n", rec.rank, rec.title));
        }
    }
    out
}
