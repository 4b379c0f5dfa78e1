use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use chrono::Local;
use csv::Writer;
use tracing::info;

use crate::analysis::statistics::SourceDistanceStats;
use crate::config::constants::{
    ANNOTATED_SOURCES_FILE_NAME, DETAIL_FILE_NAME, DISTANCE_DECIMALS, RELATED_CANDIDATES_COLUMN,
    STATISTICS_FILE_NAME,
};
use crate::config::ranking_config::ExportColumns;
use crate::data::poi::POI;
use crate::error::ProximityError;
use crate::models::proximity_result::SourceRanking;
use crate::models::site::{Site, SiteTable};
use crate::utils::logging::{self, FileIOType, OperationCategory};

fn round_km(distance_km: f64) -> String {
    format!("{:.*}", DISTANCE_DECIMALS as usize, distance_km)
}

/// Writes ranking results as CSV files into one output directory.
pub struct CsvExporter {
    output_dir: PathBuf,
}

impl CsvExporter {
    /// Creates the output directory, optionally nested under a
    /// `%Y%m%d_%H%M%S` run folder.
    pub fn new(output_dir: impl AsRef<Path>, timestamped: bool) -> Result<Self, ProximityError> {
        let output_dir = if timestamped {
            let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
            output_dir.as_ref().join(timestamp)
        } else {
            output_dir.as_ref().to_path_buf()
        };

        std::fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn writer(&self, file_name: &str) -> Result<(Writer<File>, PathBuf), ProximityError> {
        let path = self.output_dir.join(file_name);
        let writer = Writer::from_path(&path)?;
        Ok((writer, path))
    }

    /// One row per (source, rank) with selected descriptive columns of both
    /// sides. Missing attributes are left blank.
    pub fn export_detail(
        &self,
        rankings: &[SourceRanking],
        sources: &[Site],
        candidates: &[Site],
        columns: &ExportColumns,
    ) -> Result<PathBuf, ProximityError> {
        let _timing = logging::start_timing("export_detail",
            OperationCategory::FileIO { subcategory: FileIOType::ResultsSave });

        let (mut writer, path) = self.writer(DETAIL_FILE_NAME)?;

        let mut header = vec![
            "source_id".to_string(),
            "rank".to_string(),
            "candidate_id".to_string(),
            "distance_km".to_string(),
        ];
        header.extend(columns.source.iter().map(|c| format!("source_{}", c)));
        header.extend(columns.candidate.iter().map(|c| format!("candidate_{}", c)));
        writer.write_record(&header)?;

        let mut rows = 0;
        for ranking in rankings {
            let source = sources.get(ranking.source_index);
            for result in &ranking.results {
                let candidate = candidates.get(result.candidate_index);

                let mut record = vec![
                    result.source_id.clone(),
                    result.rank.to_string(),
                    result.candidate_id.clone(),
                    round_km(result.distance_km),
                ];
                record.extend(columns.source.iter().map(|c| {
                    source.and_then(|s| s.get_attribute(c)).unwrap_or_default().to_string()
                }));
                record.extend(columns.candidate.iter().map(|c| {
                    candidate.and_then(|s| s.get_attribute(c)).unwrap_or_default().to_string()
                }));
                writer.write_record(&record)?;
                rows += 1;
            }
        }
        writer.flush()?;

        info!(path = %path.display(), rows, "Detailed proximity summary saved");
        Ok(path)
    }

    pub fn export_statistics(&self, stats: &[SourceDistanceStats]) -> Result<PathBuf, ProximityError> {
        let _timing = logging::start_timing("export_statistics",
            OperationCategory::FileIO { subcategory: FileIOType::ResultsSave });

        let (mut writer, path) = self.writer(STATISTICS_FILE_NAME)?;
        writer.write_record(["source_id", "count", "min_km", "mean_km", "max_km"])?;
        for stat in stats {
            writer.write_record([
                stat.source_id.clone(),
                stat.count.to_string(),
                round_km(stat.min_km),
                round_km(stat.mean_km),
                round_km(stat.max_km),
            ])?;
        }
        writer.flush()?;

        info!(path = %path.display(), rows = stats.len(), "Distance statistics saved");
        Ok(path)
    }

    /// Every loaded source row, rejected ones included, written back with its
    /// original columns and cells plus the ranked candidate ids.
    pub fn export_annotated_sources(
        &self,
        sources: &SiteTable,
        rankings: &[SourceRanking],
    ) -> Result<PathBuf, ProximityError> {
        let _timing = logging::start_timing("export_annotated_sources",
            OperationCategory::FileIO { subcategory: FileIOType::ResultsSave });

        let related: HashMap<&str, String> = rankings
            .iter()
            .map(|r| (r.source_id.as_str(), r.related_candidates()))
            .collect();

        let (mut writer, path) = self.writer(ANNOTATED_SOURCES_FILE_NAME)?;

        let mut header: Vec<&str> = sources.headers.iter().map(String::as_str).collect();
        header.push(RELATED_CANDIDATES_COLUMN);
        writer.write_record(&header)?;

        for (site, row) in sources.records() {
            let mut record: Vec<&str> = row.iter().map(String::as_str).collect();
            record.push(related.get(site.get_id()).map(String::as_str).unwrap_or_default());
            writer.write_record(&record)?;
        }
        writer.flush()?;

        info!(path = %path.display(), rows = sources.len(), "Annotated sources saved");
        Ok(path)
    }
}
