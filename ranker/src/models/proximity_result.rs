use serde::{Deserialize, Serialize};

/// One ranked (source, candidate) pair. Rank 1 is the nearest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProximityResult {
    pub source_id: String,
    pub candidate_id: String,
    pub rank: usize,
    pub distance_km: f64,
    /// Position of the candidate in the slice handed to the ranker.
    #[serde(skip)]
    pub candidate_index: usize,
}

/// All results for a single source, nearest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRanking {
    pub source_id: String,
    pub source_index: usize,
    pub results: Vec<ProximityResult>,
}

impl SourceRanking {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn candidate_ids(&self) -> impl Iterator<Item = &str> {
        self.results.iter().map(|r| r.candidate_id.as_str())
    }

    /// Ranked candidate ids joined for a single spreadsheet cell.
    pub fn related_candidates(&self) -> String {
        self.candidate_ids().collect::<Vec<_>>().join(", ")
    }
}

/// Flattens per-source rankings into source-then-rank order.
pub fn flatten(rankings: Vec<SourceRanking>) -> Vec<ProximityResult> {
    rankings.into_iter().flat_map(|r| r.results).collect()
}
