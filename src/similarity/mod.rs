pub mod ranking;
pub mod weights;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;
pub use ranking::{JaccardScorer, SimilarityBreakdown, SimilarityScorer, WeightedScorer};
pub use weights::{SimilarityWeights, WeightsError};

/// Similarity between two items with the default weights.
pub fn similarity(a: &CatalogItem, b: &CatalogItem) -> u8 {
    WeightedScorer::default().score(a, b)
}

/// One candidate's standing against a target item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMatch {
    pub id: String,
    pub score: u8,
    pub why: SimilarityBreakdown,
}

pub struct SimilarityRanker<S> {
    scorer: S,
}

impl Default for SimilarityRanker<WeightedScorer> {
    fn default() -> Self {
        Self {
            scorer: WeightedScorer::default(),
        }
    }
}

impl<S: SimilarityScorer> SimilarityRanker<S> {
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }

    /// Rank `candidates` against `target`, best first.
    ///
    /// Ordered by (score desc, id asc). Candidates sharing the target's id
    /// are left out.
    pub fn rank_alternatives(
        &self,
        target: &CatalogItem,
        candidates: &[CatalogItem],
    ) -> Vec<RankedMatch> {
        let mut ranked: Vec<RankedMatch> = candidates
            .iter()
            .filter(|candidate| candidate.id != target.id)
            .map(|candidate| {
                let why = self.scorer.breakdown(target, candidate);
                let score = self.scorer.score_value(&why);
                RankedMatch {
                    id: candidate.id.clone(),
                    score,
                    why,
                }
            })
            .collect();

        ranked.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.id.cmp(&b.id)));

        debug_assert!(ranked
            .windows(2)
            .all(|w| w[0].score > w[1].score || (w[0].score == w[1].score && w[0].id <= w[1].id)));

        ranked
    }
}
