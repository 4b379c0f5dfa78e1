use serde::Serialize;
use crate::models::proximity_result::SourceRanking;

/// Distance spread of one source's ranked candidates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceDistanceStats {
    pub source_id: String,
    pub count: usize,
    pub min_km: f64,
    pub mean_km: f64,
    pub max_km: f64,
}

/// Aggregate over every ranked row of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceSummary {
    pub sources: usize,
    pub rows: usize,
    pub mean_km: f64,
    pub min_km: f64,
    pub max_km: f64,
}

struct Accumulator {
    count: usize,
    sum: f64,
    min: f64,
    max: f64,
}

impl Accumulator {
    fn new() -> Self {
        Self { count: 0, sum: 0.0, min: f64::INFINITY, max: f64::NEG_INFINITY }
    }

    fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// `None` when the source has no ranked candidates.
pub fn source_stats(ranking: &SourceRanking) -> Option<SourceDistanceStats> {
    if ranking.is_empty() {
        return None;
    }
    let mut acc = Accumulator::new();
    for result in &ranking.results {
        acc.add(result.distance_km);
    }
    Some(SourceDistanceStats {
        source_id: ranking.source_id.clone(),
        count: acc.count,
        min_km: acc.min,
        mean_km: acc.mean(),
        max_km: acc.max,
    })
}

pub fn per_source_stats(rankings: &[SourceRanking]) -> Vec<SourceDistanceStats> {
    rankings.iter().filter_map(source_stats).collect()
}

/// `None` when nothing was ranked at all.
pub fn summarize(rankings: &[SourceRanking]) -> Option<DistanceSummary> {
    let mut acc = Accumulator::new();
    for result in rankings.iter().flat_map(|r| &r.results) {
        acc.add(result.distance_km);
    }
    if acc.count == 0 {
        return None;
    }
    Some(DistanceSummary {
        sources: rankings.len(),
        rows: acc.count,
        mean_km: acc.mean(),
        min_km: acc.min,
        max_km: acc.max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::proximity_result::ProximityResult;

    fn ranking(source_id: &str, distances: &[f64]) -> SourceRanking {
        SourceRanking {
            source_id: source_id.to_string(),
            source_index: 0,
            results: distances
                .iter()
                .enumerate()
                .map(|(i, d)| ProximityResult {
                    source_id: source_id.to_string(),
                    candidate_id: format!("C{}", i),
                    rank: i + 1,
                    distance_km: *d,
                    candidate_index: i,
                })
                .collect(),
        }
    }

    #[test]
    fn stats_per_source() {
        let stats = source_stats(&ranking("F1", &[1.0, 2.0, 6.0])).unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min_km, 1.0);
        assert_eq!(stats.max_km, 6.0);
        assert!((stats.mean_km - 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_rankings_have_no_stats() {
        let rankings = vec![ranking("F1", &[]), ranking("F2", &[4.0])];
        let stats = per_source_stats(&rankings);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].source_id, "F2");
        assert!(summarize(&[ranking("F1", &[])]).is_none());
    }

    #[test]
    fn overall_summary() {
        let rankings = vec![ranking("F1", &[1.0, 3.0]), ranking("F2", &[0.5, 8.5])];
        let summary = summarize(&rankings).unwrap();
        assert_eq!(summary.sources, 2);
        assert_eq!(summary.rows, 4);
        assert_eq!(summary.min_km, 0.5);
        assert_eq!(summary.max_km, 8.5);
        assert!((summary.mean_km - 3.25).abs() < 1e-12);
    }
}
