use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use rayon::prelude::*;
use tracing::{debug, info, warn};
use crate::core::distance::DistanceStrategy;
use crate::core::top_k::{Neighbor, TopK};
use crate::data::poi::{Coordinate, POI};
use crate::error::{ConfigError, ProximityError};
use crate::models::proximity_result::{self, ProximityResult, SourceRanking};
use crate::utils::logging::{self, OperationCategory, RankingStage};
use crate::utils::traits::{DistanceMetric, ProgressObserver};

/// Ranks, for every source, the `k` nearest candidates.
///
/// Inputs are expected to have gone through [`crate::core::validator::validate`];
/// they are not re-validated here. A candidate without a coordinate is
/// skipped and a source without one gets an empty ranking.
pub struct Ranker<D = DistanceStrategy> {
    k: usize,
    metric: D,
    parallel: bool,
    progress: Option<Arc<dyn ProgressObserver + Send>>,
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl<D: fmt::Debug> fmt::Debug for Ranker<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ranker")
            .field("k", &self.k)
            .field("metric", &self.metric)
            .field("parallel", &self.parallel)
            .field("progress", &self.progress.is_some())
            .field("cancel_flag", &self.cancel_flag.is_some())
            .finish()
    }
}

impl<D: DistanceMetric + Sync> Ranker<D> {
    pub fn new(k: usize, metric: D) -> Result<Self, ConfigError> {
        if k < 1 {
            return Err(ConfigError::InvalidK(k as i64));
        }
        Ok(Self {
            k,
            metric,
            parallel: false,
            progress: None,
            cancel_flag: None,
        })
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_progress(mut self, observer: Arc<dyn ProgressObserver + Send>) -> Self {
        self.progress = Some(observer);
        self
    }

    /// Checked once per source; once set, ranking stops with
    /// [`ProximityError::Cancelled`].
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(flag);
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn metric(&self) -> &D {
        &self.metric
    }

    pub fn rank<S, C>(&self, sources: &[S], candidates: &[C]) -> Result<Vec<SourceRanking>, ProximityError>
    where
        S: POI + Sync,
        C: POI + Sync,
    {
        let _timing = logging::start_timing(
            "rank_sources",
            OperationCategory::Ranking { stage: RankingStage::Search },
        );

        info!(
            sources = sources.len(),
            candidates = candidates.len(),
            k = self.k,
            parallel = self.parallel,
            "Ranking nearest candidates"
        );
        if candidates.is_empty() {
            warn!("No candidates to rank; every source will get an empty ranking");
        }

        let candidate_coords: Vec<Option<Coordinate>> = {
            let _timing = logging::start_timing(
                "collect_candidate_coordinates",
                OperationCategory::Ranking { stage: RankingStage::Preparation },
            );
            candidates.iter().map(|c| c.get_coordinate()).collect()
        };

        let total = sources.len();
        let completed = AtomicUsize::new(0);

        let rank_one = |(source_index, source): (usize, &S)| -> Result<SourceRanking, ProximityError> {
            if self.is_cancelled() {
                return Err(ProximityError::Cancelled {
                    completed: completed.load(Ordering::SeqCst),
                    total,
                });
            }

            let ranking = self.rank_source(source_index, source, candidates, &candidate_coords);

            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(observer) = &self.progress {
                observer.on_source_ranked(done, total);
            }
            Ok(ranking)
        };

        // Indexed collection keeps source order regardless of which worker
        // finishes first.
        let rankings: Vec<Result<SourceRanking, ProximityError>> = if self.parallel {
            sources.par_iter().enumerate().map(rank_one).collect()
        } else {
            sources.iter().enumerate().map(rank_one).collect()
        };

        if let Some(observer) = &self.progress {
            observer.on_finished();
        }

        let rankings = rankings.into_iter().collect::<Result<Vec<_>, _>>()?;
        let rows: usize = rankings.iter().map(|r| r.results.len()).sum();
        info!(rows, "Ranking finished");

        Ok(rankings)
    }

    /// Same as [`Ranker::rank`], flattened in source-then-rank order.
    pub fn rank_flat<S, C>(&self, sources: &[S], candidates: &[C]) -> Result<Vec<ProximityResult>, ProximityError>
    where
        S: POI + Sync,
        C: POI + Sync,
    {
        Ok(proximity_result::flatten(self.rank(sources, candidates)?))
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    fn rank_source<S: POI, C: POI>(
        &self,
        source_index: usize,
        source: &S,
        candidates: &[C],
        candidate_coords: &[Option<Coordinate>],
    ) -> SourceRanking {
        let source_id = source.get_id().to_string();

        let Some(origin) = source.get_coordinate() else {
            warn!(source = %source_id, "Source has no coordinate; skipping");
            return SourceRanking {
                source_id,
                source_index,
                results: Vec::new(),
            };
        };

        let mut top = TopK::new(self.k.min(candidate_coords.len()));
        for (index, coordinate) in candidate_coords.iter().enumerate() {
            if let Some(coordinate) = coordinate {
                top.offer(Neighbor {
                    distance_km: self.metric.distance_km(&origin, coordinate),
                    index,
                });
            }
        }

        let results: Vec<ProximityResult> = top
            .into_sorted_vec()
            .into_iter()
            .enumerate()
            .map(|(position, neighbor)| ProximityResult {
                source_id: source_id.clone(),
                candidate_id: candidates[neighbor.index].get_id().to_string(),
                rank: position + 1,
                distance_km: neighbor.distance_km,
                candidate_index: neighbor.index,
            })
            .collect();

        debug!(
            source = %source_id,
            kept = results.len(),
            nearest_km = results.first().map(|r| r.distance_km),
            "Ranked source"
        );

        SourceRanking {
            source_id,
            source_index,
            results,
        }
    }
}

/// Ranks with the default geodesic metric, sequentially.
pub fn rank_nearest<S, C>(sources: &[S], candidates: &[C], k: usize) -> Result<Vec<ProximityResult>, ProximityError>
where
    S: POI + Sync,
    C: POI + Sync,
{
    Ranker::new(k, DistanceStrategy::default())?.rank_flat(sources, candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::site::Site;
    use std::sync::Mutex;

    fn farm() -> Vec<Site> {
        vec![Site::at("F1", 4.0, -74.0)]
    }

    fn communities() -> Vec<Site> {
        vec![Site::at("C1", 4.0, -74.0), Site::at("C2", 5.0, -74.0)]
    }

    #[test]
    fn nearest_scenario() {
        let results = rank_nearest(&farm(), &communities(), 2).unwrap();
        assert_eq!(results.len(), 2);

        assert_eq!(results[0].source_id, "F1");
        assert_eq!(results[0].candidate_id, "C1");
        assert_eq!(results[0].rank, 1);
        assert!(results[0].distance_km.abs() < 1e-6);

        assert_eq!(results[1].candidate_id, "C2");
        assert_eq!(results[1].rank, 2);
        assert!((results[1].distance_km - 110.6).abs() < 0.1);
        assert_eq!(results[1].candidate_index, 1);
    }

    #[test]
    fn haversine_scenario() {
        let ranker = Ranker::new(2, DistanceStrategy::Haversine).unwrap();
        let results = ranker.rank_flat(&farm(), &communities()).unwrap();
        assert!((results[1].distance_km - 111.2).abs() < 0.1);
    }

    #[test]
    fn k_below_one_fails_fast() {
        assert!(matches!(
            rank_nearest(&farm(), &communities(), 0),
            Err(ProximityError::Config(ConfigError::InvalidK(0)))
        ));
    }

    #[test]
    fn empty_candidates_give_empty_rankings() {
        let sources = vec![Site::at("S1", 1.0, 1.0), Site::at("S2", 2.0, 2.0)];
        let ranker = Ranker::new(10, DistanceStrategy::Geodesic).unwrap();
        let rankings = ranker.rank(&sources, &Vec::<Site>::new()).unwrap();
        assert_eq!(rankings.len(), 2);
        assert!(rankings.iter().all(SourceRanking::is_empty));
        assert_eq!(rankings[1].source_id, "S2");
    }

    #[test]
    fn empty_sources_give_nothing() {
        let results = rank_nearest(&Vec::<Site>::new(), &communities(), 3).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn fewer_candidates_than_k() {
        let candidates = vec![
            Site::at("A", 0.0, 1.0),
            Site::at("B", 0.0, 3.0),
            Site::at("C", 0.0, 2.0),
        ];
        let results = rank_nearest(&[Site::at("S", 0.0, 0.0)], &candidates, 10).unwrap();
        let ranked: Vec<_> = results.iter().map(|r| (r.rank, r.candidate_id.as_str())).collect();
        assert_eq!(ranked, vec![(1, "A"), (2, "C"), (3, "B")]);
    }

    #[test]
    fn ties_follow_candidate_order() {
        // Same point listed three times, plus one farther away.
        let candidates = vec![
            Site::at("far", 10.0, 10.0),
            Site::at("dup-a", 1.0, 1.0),
            Site::at("dup-b", 1.0, 1.0),
            Site::at("dup-c", 1.0, 1.0),
        ];
        let results = rank_nearest(&[Site::at("S", 0.0, 0.0)], &candidates, 2).unwrap();
        let ids: Vec<_> = results.iter().map(|r| r.candidate_id.as_str()).collect();
        assert_eq!(ids, vec!["dup-a", "dup-b"]);
    }

    #[test]
    fn skips_unlocated_records() {
        let candidates = vec![Site::new("ghost", None, None), Site::at("real", 0.0, 1.0)];
        let sources = vec![Site::new("lost", Some(1.0), None), Site::at("S", 0.0, 0.0)];
        let ranker = Ranker::new(5, DistanceStrategy::Haversine).unwrap();
        let rankings = ranker.rank(&sources, &candidates).unwrap();
        assert!(rankings[0].is_empty());
        assert_eq!(rankings[1].related_candidates(), "real");
    }

    #[test]
    fn parallel_matches_sequential() {
        let sources: Vec<Site> = (0..40)
            .map(|i| Site::at(format!("S{}", i), -4.0 + i as f64 * 0.45, -80.0 + i as f64 * 0.3))
            .collect();
        let candidates: Vec<Site> = (0..300)
            .map(|i| Site::at(format!("C{}", i), -4.0 + (i % 37) as f64 * 0.5, -79.0 + (i % 23) as f64 * 0.6))
            .collect();

        let sequential = Ranker::new(7, DistanceStrategy::Geodesic).unwrap();
        let parallel = Ranker::new(7, DistanceStrategy::Geodesic).unwrap().with_parallel(true);

        let a = sequential.rank(&sources, &candidates).unwrap();
        let b = parallel.rank(&sources, &candidates).unwrap();
        assert_eq!(a, b);
    }

    struct Recorder(Mutex<Vec<(usize, usize)>>, AtomicBool);

    impl ProgressObserver for Recorder {
        fn on_source_ranked(&self, completed: usize, total: usize) {
            self.0.lock().unwrap().push((completed, total));
        }

        fn on_finished(&self) {
            self.1.store(true, Ordering::SeqCst);
        }
    }

    #[test]
    fn progress_is_reported_per_source() {
        let recorder = Arc::new(Recorder(Mutex::new(Vec::new()), AtomicBool::new(false)));
        let ranker = Ranker::new(1, DistanceStrategy::Geodesic)
            .unwrap()
            .with_progress(recorder.clone());
        let sources = vec![Site::at("S1", 0.0, 0.0), Site::at("S2", 1.0, 1.0)];
        ranker.rank(&sources, &communities()).unwrap();

        assert_eq!(*recorder.0.lock().unwrap(), vec![(1, 2), (2, 2)]);
        assert!(recorder.1.load(Ordering::SeqCst));
    }

    #[test]
    fn cancelled_before_start() {
        let flag = Arc::new(AtomicBool::new(true));
        let ranker = Ranker::new(1, DistanceStrategy::Geodesic)
            .unwrap()
            .with_cancel_flag(flag);
        let result = ranker.rank(&farm(), &communities());
        assert!(matches!(result, Err(ProximityError::Cancelled { completed: 0, total: 1 })));
    }

    /// Raises the cancel flag once the first source is done.
    struct StopAfterFirst(Arc<AtomicBool>);

    impl ProgressObserver for StopAfterFirst {
        fn on_source_ranked(&self, completed: usize, _total: usize) {
            if completed == 1 {
                self.0.store(true, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn cancelled_between_sources() {
        let flag = Arc::new(AtomicBool::new(false));
        let ranker = Ranker::new(1, DistanceStrategy::Geodesic)
            .unwrap()
            .with_progress(Arc::new(StopAfterFirst(flag.clone())))
            .with_cancel_flag(flag.clone());
        let sources = vec![
            Site::at("S1", 0.0, 0.0),
            Site::at("S2", 1.0, 1.0),
            Site::at("S3", 2.0, 2.0),
        ];

        let result = ranker.rank(&sources, &communities());
        assert!(matches!(result, Err(ProximityError::Cancelled { completed: 1, total: 3 })));
        assert!(flag.load(Ordering::SeqCst));
    }
}
