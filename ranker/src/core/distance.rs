use std::fmt;
use std::str::FromStr;
use geo::{Distance, Geodesic, Haversine};
use serde::{Deserialize, Serialize};
use crate::config::constants::METERS_PER_KM;
use crate::data::poi::Coordinate;
use crate::error::ConfigError;
use crate::utils::traits::DistanceMetric;

/// How distances between sites are measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceStrategy {
    /// WGS-84 ellipsoid (Karney).
    #[default]
    Geodesic,
    /// Sphere with the mean Earth radius. Faster, slightly less accurate.
    Haversine,
}

impl DistanceStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceStrategy::Geodesic => "geodesic",
            DistanceStrategy::Haversine => "haversine",
        }
    }
}

impl fmt::Display for DistanceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "geodesic" => Ok(DistanceStrategy::Geodesic),
            "haversine" => Ok(DistanceStrategy::Haversine),
            _ => Err(ConfigError::UnknownDistanceStrategy(s.to_string())),
        }
    }
}

impl DistanceMetric for DistanceStrategy {
    fn distance_km(&self, from: &Coordinate, to: &Coordinate) -> f64 {
        let (a, b) = (from.to_point(), to.to_point());
        let meters = match self {
            DistanceStrategy::Geodesic => Geodesic.distance(a, b),
            DistanceStrategy::Haversine => Haversine.distance(a, b),
        };
        meters / METERS_PER_KM
    }
}
