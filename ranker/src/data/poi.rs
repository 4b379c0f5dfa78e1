use serde::{Deserialize, Serialize};
use crate::config::constants::{MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Finite and inside the WGS-84 degree ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (MIN_LAT..=MAX_LAT).contains(&self.latitude)
            && (MIN_LON..=MAX_LON).contains(&self.longitude)
    }

    pub(crate) fn to_point(self) -> geo::Point<f64> {
        // geo points are (x = lon, y = lat)
        geo::Point::new(self.longitude, self.latitude)
    }
}

/// A record with an identifier and a possibly missing location.
pub trait POI {
    fn get_id(&self) -> &str;
    fn get_latitude(&self) -> Option<f64>;
    fn get_longitude(&self) -> Option<f64>;

    fn get_coordinate(&self) -> Option<Coordinate> {
        match (self.get_latitude(), self.get_longitude()) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        }
    }
}

impl<T: POI + ?Sized> POI for &T {
    fn get_id(&self) -> &str {
        (**self).get_id()
    }

    fn get_latitude(&self) -> Option<f64> {
        (**self).get_latitude()
    }

    fn get_longitude(&self) -> Option<f64> {
        (**self).get_longitude()
    }
}
