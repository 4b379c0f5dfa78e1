use clap::Parser;
use crate::config::constants::DEFAULT_REPORT_LIMIT;
use crate::config::ranking_config::{BoundingBox, RankingConfig};
use crate::error::ConfigError;

#[derive(Parser, Debug)]
#[command(author, version, about = "Ranks the nearest candidate sites for every source site", long_about = None)]
pub struct Args {
    #[arg(short, long, help = "CSV file with the source sites (e.g. solar farms)")]
    sources: String,

    #[arg(short, long, help = "CSV file with the candidate sites (e.g. energy communities)")]
    candidates: String,

    #[arg(short, long, help = "Nearest candidates kept per source [default: 10]")]
    k: Option<i64>,

    #[arg(long, help = "Distance strategy: geodesic or haversine [default: geodesic]")]
    strategy: Option<String>,

    #[arg(long, help = "JSON config file; command line flags take precedence")]
    config: Option<String>,

    #[arg(long, help = "Bounding box filter as min_lat,max_lat,min_lon,max_lon", conflicts_with = "bbox_preset")]
    bbox: Option<String>,

    #[arg(long, help = "Named bounding box filter (colombia)")]
    bbox_preset: Option<String>,

    #[arg(short, long, default_value = "results")]
    output_dir: String,

    #[arg(long, default_value_t = false, help = "Write directly into the output directory instead of a timestamped run folder")]
    no_timestamp: bool,

    #[arg(long, help = "Rank sources in parallel (overrides the config file)")]
    parallel: Option<bool>,

    #[arg(long, help = "Worker threads for parallel ranking")]
    threads: Option<usize>,

    #[arg(long, default_value_t = false)]
    no_progress: bool,

    #[arg(long, default_value_t = false)]
    enable_timing: bool,

    #[arg(long, default_value_t = DEFAULT_REPORT_LIMIT, help = "Candidates printed per source")]
    report_limit: usize,
}

// Add getter methods for all fields
impl Args {
    pub fn sources(&self) -> &str {
        &self.sources
    }

    pub fn candidates(&self) -> &str {
        &self.candidates
    }

    pub fn config(&self) -> Option<&str> {
        self.config.as_deref()
    }

    pub fn output_dir(&self) -> &str {
        &self.output_dir
    }

    pub fn timestamped(&self) -> bool {
        !self.no_timestamp
    }

    pub fn show_progress(&self) -> bool {
        !self.no_progress
    }

    pub fn enable_timing(&self) -> bool {
        self.enable_timing
    }

    pub fn report_limit(&self) -> usize {
        self.report_limit
    }

    /// Layers the command line over `base`.
    pub fn apply_to(&self, mut base: RankingConfig) -> Result<RankingConfig, ConfigError> {
        if let Some(k) = self.k {
            base.k = k;
        }
        if let Some(strategy) = &self.strategy {
            base.distance_strategy = strategy.clone();
        }
        if let Some(text) = &self.bbox {
            base.bounding_box = Some(BoundingBox::parse(text)?);
        }
        if let Some(preset) = &self.bbox_preset {
            base.bounding_box = Some(BoundingBox::from_preset(preset)?);
        }
        if let Some(parallel) = self.parallel {
            base.parallel = parallel;
        }
        if self.threads.is_some() {
            base.threads = self.threads;
        }
        Ok(base)
    }
}
