use std::fs::File;
use std::io::Read;
use std::path::Path;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info, warn};
use crate::config::ranking_config::SiteFields;
use crate::error::LoadError;
use crate::models::site::{Site, SiteTable};
use crate::utils::logging::{self, FileIOType, OperationCategory};

/// Column positions resolved from the header row.
struct ColumnLayout {
    id: usize,
    latitude: usize,
    longitude: usize,
}

impl ColumnLayout {
    fn resolve(headers: &StringRecord, fields: &SiteFields, dataset: &str) -> Result<Self, LoadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| LoadError::MissingColumn {
                    dataset: dataset.to_string(),
                    column: name.to_string(),
                })
        };

        if let Some(label) = &fields.label {
            if !headers.iter().any(|h| h == label) {
                warn!(dataset, column = %label, "Label column not found; reports will show ids only");
            }
        }

        Ok(Self {
            id: find(&fields.id)?,
            latitude: find(&fields.latitude)?,
            longitude: find(&fields.longitude)?,
        })
    }
}

/// Empty or non-numeric cells are a data-quality issue for the validator,
/// not a load failure.
fn parse_coordinate(record: &StringRecord, column: usize) -> Option<f64> {
    record
        .get(column)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse::<f64>().ok())
}

/// Reads every record, keeping the raw cells next to the parsed site.
/// Short rows are padded with empty cells; cells beyond the header have no
/// column name and are dropped.
pub fn load_table_from_reader<R: Read>(reader: R, fields: &SiteFields, dataset: &str) -> Result<SiteTable, LoadError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let layout = ColumnLayout::resolve(&headers, fields, dataset)?;
    let width = headers.len();

    let mut table = SiteTable {
        headers: headers.iter().map(str::to_string).collect(),
        ..SiteTable::default()
    };
    let mut overlong = 0usize;

    for result in reader.records() {
        let record = result?;
        if record.len() > width {
            overlong += 1;
        }

        let id = record.get(layout.id).map(str::trim).unwrap_or_default();
        let (latitude, longitude) = if id.is_empty() {
            // No identifier to report against: leave it for the validator to reject
            debug!(dataset, line = ?record.position().map(|p| p.line()), "Record without id");
            (None, None)
        } else {
            (parse_coordinate(&record, layout.latitude), parse_coordinate(&record, layout.longitude))
        };

        let row: Vec<String> = (0..width)
            .map(|i| record.get(i).unwrap_or_default().to_string())
            .collect();

        let attributes = table
            .headers
            .iter()
            .zip(&row)
            .enumerate()
            .filter(|(i, _)| *i != layout.id && *i != layout.latitude && *i != layout.longitude)
            .map(|(_, (name, value))| (name.clone(), value.clone()))
            .collect();

        table.sites.push(Site::new(id, latitude, longitude).with_attributes(attributes));
        table.rows.push(row);
    }

    if overlong > 0 {
        warn!(dataset, records = overlong, "Cells beyond the header row were ignored");
    }

    Ok(table)
}

pub fn load_sites_from_reader<R: Read>(reader: R, fields: &SiteFields, dataset: &str) -> Result<Vec<Site>, LoadError> {
    Ok(load_table_from_reader(reader, fields, dataset)?.sites)
}

pub fn load_table(csv_path: impl AsRef<Path>, fields: &SiteFields, dataset: &str) -> Result<SiteTable, LoadError> {
    let _timing = logging::start_timing("load_sites",
        OperationCategory::FileIO { subcategory: FileIOType::DataLoad });

    let path = csv_path.as_ref();
    let file = File::open(path)?;
    let table = load_table_from_reader(file, fields, dataset)?;

    info!(dataset, path = %path.display(), records = table.len(), "Loaded {} records", dataset);
    Ok(table)
}

pub fn load_sites(csv_path: impl AsRef<Path>, fields: &SiteFields, dataset: &str) -> Result<Vec<Site>, LoadError> {
    Ok(load_table(csv_path, fields, dataset)?.sites)
}
