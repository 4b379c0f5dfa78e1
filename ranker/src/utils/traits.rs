// Seams the ranker is generic over

use crate::data::poi::Coordinate;

/// Surface distance between two coordinates, in kilometers.
pub trait DistanceMetric {
    fn distance_km(&self, from: &Coordinate, to: &Coordinate) -> f64;
}

/// Observes ranking progress. Called once per finished source, possibly from
/// several worker threads.
pub trait ProgressObserver: Sync {
    fn on_source_ranked(&self, completed: usize, total: usize);

    fn on_finished(&self) {}
}
