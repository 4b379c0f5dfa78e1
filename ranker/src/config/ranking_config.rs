use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::config::constants::*;
use crate::core::distance::DistanceStrategy;
use crate::core::ranker::Ranker;
use crate::error::{ConfigError, LoadError};

/// Inclusive latitude/longitude window applied during validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Result<Self, ConfigError> {
        let bbox = Self { min_lat, max_lat, min_lon, max_lon };
        bbox.check()?;
        Ok(bbox)
    }

    pub fn colombia() -> Self {
        Self {
            min_lat: COLOMBIA_MIN_LAT,
            max_lat: COLOMBIA_MAX_LAT,
            min_lon: COLOMBIA_MIN_LON,
            max_lon: COLOMBIA_MAX_LON,
        }
    }

    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name.trim().to_lowercase().as_str() {
            "colombia" => Ok(Self::colombia()),
            other => Err(ConfigError::UnknownBoundingBoxPreset(other.to_string())),
        }
    }

    /// Parses `min_lat,max_lat,min_lon,max_lon`.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let values = text
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ConfigError::InvalidBoundingBox(format!("cannot parse '{}'", text)))?;

        match values.as_slice() {
            [min_lat, max_lat, min_lon, max_lon] => Self::new(*min_lat, *max_lat, *min_lon, *max_lon),
            _ => Err(ConfigError::InvalidBoundingBox(format!(
                "expected 4 comma-separated values, got {}",
                values.len()
            ))),
        }
    }

    pub fn check(&self) -> Result<(), ConfigError> {
        let all_finite = [self.min_lat, self.max_lat, self.min_lon, self.max_lon]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(ConfigError::InvalidBoundingBox("bounds must be finite".to_string()));
        }
        if self.min_lat > self.max_lat || self.min_lon > self.max_lon {
            return Err(ConfigError::InvalidBoundingBox(format!(
                "inverted bounds: lat {}..{}, lon {}..{}",
                self.min_lat, self.max_lat, self.min_lon, self.max_lon
            )));
        }
        if self.min_lat < MIN_LAT || self.max_lat > MAX_LAT || self.min_lon < MIN_LON || self.max_lon > MAX_LON {
            return Err(ConfigError::InvalidBoundingBox(
                "bounds exceed the valid latitude/longitude ranges".to_string(),
            ));
        }
        Ok(())
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.min_lat
            && latitude <= self.max_lat
            && longitude >= self.min_lon
            && longitude <= self.max_lon
    }
}

/// Column names for one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteFields {
    pub id: String,
    pub latitude: String,
    pub longitude: String,
    pub label: Option<String>,
}

/// Maps the logical roles onto the caller's column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    pub source_id: String,
    pub source_lat: String,
    pub source_lon: String,
    pub source_label: Option<String>,
    pub candidate_id: String,
    pub candidate_lat: String,
    pub candidate_lon: String,
    pub candidate_label: Option<String>,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            source_id: DEFAULT_SOURCE_ID_FIELD.to_string(),
            source_lat: DEFAULT_SOURCE_LAT_FIELD.to_string(),
            source_lon: DEFAULT_SOURCE_LON_FIELD.to_string(),
            source_label: Some(DEFAULT_SOURCE_LABEL_FIELD.to_string()),
            candidate_id: DEFAULT_CANDIDATE_ID_FIELD.to_string(),
            candidate_lat: DEFAULT_CANDIDATE_LAT_FIELD.to_string(),
            candidate_lon: DEFAULT_CANDIDATE_LON_FIELD.to_string(),
            candidate_label: Some(DEFAULT_CANDIDATE_LABEL_FIELD.to_string()),
        }
    }
}

impl FieldNames {
    pub fn source_fields(&self) -> SiteFields {
        SiteFields {
            id: self.source_id.clone(),
            latitude: self.source_lat.clone(),
            longitude: self.source_lon.clone(),
            label: self.source_label.clone(),
        }
    }

    pub fn candidate_fields(&self) -> SiteFields {
        SiteFields {
            id: self.candidate_id.clone(),
            latitude: self.candidate_lat.clone(),
            longitude: self.candidate_lon.clone(),
            label: self.candidate_label.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_roles(
            "source",
            &[("source_id", &self.source_id), ("source_lat", &self.source_lat), ("source_lon", &self.source_lon)],
        )?;
        check_roles(
            "candidate",
            &[
                ("candidate_id", &self.candidate_id),
                ("candidate_lat", &self.candidate_lat),
                ("candidate_lon", &self.candidate_lon),
            ],
        )
    }
}

fn check_roles(dataset: &str, roles: &[(&str, &String)]) -> Result<(), ConfigError> {
    for (role, name) in roles {
        if name.trim().is_empty() {
            return Err(ConfigError::MalformedFieldMapping(format!("{} has an empty column name", role)));
        }
    }
    for (i, (role_a, name_a)) in roles.iter().enumerate() {
        for (role_b, name_b) in &roles[i + 1..] {
            if name_a == name_b {
                return Err(ConfigError::MalformedFieldMapping(format!(
                    "{} roles {} and {} both map to column '{}'",
                    dataset, role_a, role_b, name_a
                )));
            }
        }
    }
    Ok(())
}

/// Descriptive columns copied into the detailed export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportColumns {
    pub source: Vec<String>,
    pub candidate: Vec<String>,
}

impl Default for ExportColumns {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE_EXPORT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            candidate: DEFAULT_CANDIDATE_EXPORT_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub k: i64,
    pub distance_strategy: String,
    pub bounding_box: Option<BoundingBox>,
    pub field_names: FieldNames,
    pub export_columns: ExportColumns,
    pub parallel: bool,
    pub threads: Option<usize>,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_K as i64,
            distance_strategy: DistanceStrategy::default().as_str().to_string(),
            bounding_box: None,
            field_names: FieldNames::default(),
            export_columns: ExportColumns::default(),
            parallel: true,
            threads: None,
        }
    }
}

impl RankingConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let file = File::open(path)?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    pub fn k(&self) -> Result<usize, ConfigError> {
        if self.k < 1 {
            return Err(ConfigError::InvalidK(self.k));
        }
        Ok(self.k as usize)
    }

    pub fn strategy(&self) -> Result<DistanceStrategy, ConfigError> {
        self.distance_strategy.parse()
    }

    /// Checks every option; nothing should run until this passes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.k()?;
        self.strategy()?;
        if let Some(bbox) = &self.bounding_box {
            bbox.check()?;
        }
        self.field_names.validate()?;
        if self.threads == Some(0) {
            return Err(ConfigError::InvalidThreadCount);
        }
        Ok(())
    }

    pub fn build_ranker(&self) -> Result<Ranker<DistanceStrategy>, ConfigError> {
        self.validate()?;
        Ok(Ranker::new(self.k()?, self.strategy()?)?.with_parallel(self.parallel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = RankingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.k().unwrap(), 10);
        assert_eq!(config.strategy().unwrap(), DistanceStrategy::Geodesic);
    }

    #[test]
    fn rejects_k_below_one() {
        let config = RankingConfig { k: 0, ..RankingConfig::default() };
        assert_eq!(config.validate(), Err(ConfigError::InvalidK(0)));

        let config = RankingConfig { k: -3, ..RankingConfig::default() };
        assert!(config.build_ranker().is_err());
    }

    #[test]
    fn rejects_unknown_strategy() {
        let config = RankingConfig {
            distance_strategy: "manhattan".to_string(),
            ..RankingConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnknownDistanceStrategy("manhattan".to_string()))
        );
    }

    #[test]
    fn rejects_duplicate_field_roles() {
        let mut config = RankingConfig::default();
        config.field_names.candidate_lat = "x".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::MalformedFieldMapping(_))));

        let mut config = RankingConfig::default();
        config.field_names.source_id = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::MalformedFieldMapping(_))));
    }

    #[test]
    fn rejects_zero_threads() {
        let config = RankingConfig { threads: Some(0), ..RankingConfig::default() };
        assert_eq!(config.validate(), Err(ConfigError::InvalidThreadCount));
    }

    #[test]
    fn parses_partial_json_with_defaults() {
        let json = r#"{ "k": 3, "distance_strategy": "haversine",
                        "bounding_box": { "min_lat": -5, "max_lat": 15, "min_lon": -85, "max_lon": -65 } }"#;
        let config: RankingConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.k().unwrap(), 3);
        assert_eq!(config.strategy().unwrap(), DistanceStrategy::Haversine);
        assert_eq!(config.bounding_box, Some(BoundingBox::colombia()));
        assert_eq!(config.field_names, FieldNames::default());
        assert!(config.parallel);
    }

    #[test]
    fn bounding_box_parsing_and_presets() {
        let bbox = BoundingBox::parse("-5, 15, -85, -65").unwrap();
        assert_eq!(bbox, BoundingBox::colombia());
        assert_eq!(BoundingBox::from_preset(" Colombia ").unwrap(), BoundingBox::colombia());

        assert!(matches!(BoundingBox::parse("1,2,3"), Err(ConfigError::InvalidBoundingBox(_))));
        assert!(matches!(BoundingBox::parse("a,b,c,d"), Err(ConfigError::InvalidBoundingBox(_))));
        assert!(matches!(BoundingBox::new(10.0, 0.0, 0.0, 1.0), Err(ConfigError::InvalidBoundingBox(_))));
        assert!(matches!(BoundingBox::new(0.0, 95.0, 0.0, 1.0), Err(ConfigError::InvalidBoundingBox(_))));
        assert!(matches!(
            BoundingBox::from_preset("ireland"),
            Err(ConfigError::UnknownBoundingBoxPreset(_))
        ));
        assert!(matches!(
            BoundingBox::from_preset("atlantis"),
            Err(ConfigError::UnknownBoundingBoxPreset(_))
        ));
    }

    #[test]
    fn bounding_box_is_inclusive() {
        let bbox = BoundingBox::colombia();
        assert!(bbox.contains(-5.0, -85.0));
        assert!(bbox.contains(15.0, -65.0));
        assert!(!bbox.contains(15.01, -70.0));
        assert!(!bbox.contains(4.0, -64.9));
    }
}
