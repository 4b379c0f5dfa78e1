use thiserror::Error;

/// Configuration problems. Always fatal and raised before any ranking work.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("k must be at least 1 (got {0})")]
    InvalidK(i64),
    #[error("unknown distance strategy '{0}' (expected 'geodesic' or 'haversine')")]
    UnknownDistanceStrategy(String),
    #[error("malformed field mapping: {0}")]
    MalformedFieldMapping(String),
    #[error("invalid bounding box: {0}")]
    InvalidBoundingBox(String),
    #[error("unknown bounding box preset '{0}'")]
    UnknownBoundingBoxPreset(String),
    #[error("thread count must be at least 1")]
    InvalidThreadCount,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("column '{column}' not found in {dataset} header")]
    MissingColumn { dataset: String, column: String },
    #[error("invalid config file: {0}")]
    ConfigFile(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ProximityError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("ranking cancelled after {completed} of {total} sources")]
    Cancelled { completed: usize, total: usize },
    #[error("export failed: {0}")]
    Export(String),
}

impl From<csv::Error> for ProximityError {
    fn from(err: csv::Error) -> Self {
        ProximityError::Export(err.to_string())
    }
}

impl From<std::io::Error> for ProximityError {
    fn from(err: std::io::Error) -> Self {
        ProximityError::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ProximityError>;
