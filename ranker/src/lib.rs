// Main module declarations for the proximity ranker

// Core ranking modules
pub mod core {
    pub mod validator;
    pub mod distance;
    pub mod top_k;
    pub mod ranker;
}

// Configuration modules
pub mod config {
    pub mod constants;
    pub mod ranking_config;
}

// Model definitions
pub mod models {
    pub mod site;
    pub mod proximity_result;
}

// Data loaders
pub mod data {
    pub mod poi;
    pub mod sites_loader;
}

// Analysis and reporting
pub mod analysis {
    pub mod statistics;
    pub mod reporting;
}

// Utility functions
pub mod utils {
    pub mod logging;
    pub mod csv_export;
    pub mod progress;
    pub mod traits;
}

// CLI interface
pub mod cli {
    pub mod cli;
}

pub mod error;

// Re-export commonly used items
pub use crate::config::ranking_config::{BoundingBox, FieldNames, RankingConfig};
pub use crate::core::distance::DistanceStrategy;
pub use crate::core::ranker::{rank_nearest, Ranker};
pub use crate::core::validator::{validate, ValidationReport};
pub use crate::data::poi::{Coordinate, POI};
pub use crate::error::{ConfigError, LoadError, ProximityError};
pub use crate::models::proximity_result::{ProximityResult, SourceRanking};
pub use crate::models::site::{CandidatePoint, Site, SiteTable, SourcePoint};
