use tracing::{info, warn};
use crate::config::ranking_config::BoundingBox;
use crate::data::poi::{Coordinate, POI};

/// Outcome of a validation pass. Rejections are counted, never raised.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport<T> {
    pub valid: Vec<T>,
    pub invalid_count: usize,
    pub total: usize,
}

impl<T> ValidationReport<T> {
    pub fn valid_count(&self) -> usize {
        self.valid.len()
    }

    pub fn log_summary(&self, label: &str) {
        if self.invalid_count > 0 {
            warn!(
                rejected = self.invalid_count,
                total = self.total,
                "{} of {} {} records rejected (missing or out-of-range coordinates)",
                self.invalid_count,
                self.total,
                label
            );
        } else {
            info!(total = self.total, "All {} {} records have valid coordinates", self.total, label);
        }
    }
}

pub fn is_valid_coordinate(latitude: Option<f64>, longitude: Option<f64>, bounding_box: Option<&BoundingBox>) -> bool {
    let (Some(lat), Some(lon)) = (latitude, longitude) else {
        return false;
    };
    if !Coordinate::new(lat, lon).is_valid() {
        return false;
    }
    bounding_box.map_or(true, |bbox| bbox.contains(lat, lon))
}

/// Keeps records with usable coordinates, in their original order.
pub fn validate<T: POI>(points: Vec<T>, bounding_box: Option<&BoundingBox>) -> ValidationReport<T> {
    let total = points.len();
    let valid: Vec<T> = points
        .into_iter()
        .filter(|p| is_valid_coordinate(p.get_latitude(), p.get_longitude(), bounding_box))
        .collect();

    ValidationReport {
        invalid_count: total - valid.len(),
        total,
        valid,
    }
}
