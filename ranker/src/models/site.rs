use serde::{Deserialize, Serialize};
use crate::data::poi::POI;

/// A located record from either dataset. Descriptive columns ride along
/// untouched in `attributes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    id: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    attributes: Vec<(String, String)>,
}

/// A facility that receives its own nearest-candidate ranking.
pub type SourcePoint = Site;
/// A site that can be ranked against sources.
pub type CandidatePoint = Site;

impl Site {
    pub fn new(id: impl Into<String>, latitude: Option<f64>, longitude: Option<f64>) -> Self {
        Self {
            id: id.into(),
            latitude,
            longitude,
            attributes: Vec::new(),
        }
    }

    pub fn at(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self::new(id, Some(latitude), Some(longitude))
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_attributes(mut self, attributes: Vec<(String, String)>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn get_attributes(&self) -> &[(String, String)] {
        &self.attributes
    }
}

/// A loaded dataset: the header row plus every record both parsed and as
/// written, so exports can reproduce the input columns untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteTable {
    pub headers: Vec<String>,
    pub sites: Vec<Site>,
    /// Raw cells per record, padded to `headers.len()`.
    pub rows: Vec<Vec<String>>,
}

impl SiteTable {
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = (&Site, &[String])> {
        self.sites.iter().zip(self.rows.iter().map(Vec::as_slice))
    }
}

impl POI for Site {
    fn get_id(&self) -> &str {
        &self.id
    }

    fn get_latitude(&self) -> Option<f64> {
        self.latitude
    }

    fn get_longitude(&self) -> Option<f64> {
        self.longitude
    }
}
