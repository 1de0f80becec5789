use std::cmp::Ordering;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::categories::prettify;
use crate::tables::ProductAffinity;

/// Shuffle-among-the-best: keep the `pool` highest scored products of a segment, then draw
/// `count` of them without replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerPolicy {
    pub pool: usize,
    pub count: usize,
}

impl Default for SamplerPolicy {
    fn default() -> Self {
        Self { pool: 10, count: 5 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub display_name: String,
    pub product_id: String,
    /// Percentage in `[0, 100]` as delivered by the upstream feed.
    pub match_score: f64,
}

fn by_score_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// The `pool` best rows of `segment`, highest score first. Ties keep file order.
pub fn top_candidates<'a>(
    rows: &'a [ProductAffinity],
    segment: &str,
    pool: usize,
) -> Vec<&'a ProductAffinity> {
    let mut candidates: Vec<&ProductAffinity> = rows
        .iter()
        .filter(|row| row.customer_segment == segment)
        .collect();
    candidates.sort_by(|a, b| by_score_desc(a.match_score, b.match_score));
    candidates.truncate(pool);
    candidates
}

/// Draws a fresh set of suggestions. Returns an empty list when the segment has no products.
pub fn sample_recommendations<R: Rng + ?Sized>(
    rows: &[ProductAffinity],
    segment: &str,
    policy: SamplerPolicy,
    rng: &mut R,
) -> Vec<Recommendation> {
    let candidates = top_candidates(rows, segment, policy.pool);
    let mut drawn: Vec<Recommendation> = candidates
        .choose_multiple(rng, policy.count)
        .map(|row| Recommendation {
            display_name: prettify(&row.display_name),
            product_id: row.product_id.clone(),
            match_score: row.match_score,
        })
        .collect();
    drawn.sort_by(|a, b| by_score_desc(a.match_score, b.match_score));
    drawn
}
