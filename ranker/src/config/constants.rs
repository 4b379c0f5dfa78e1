// Ranking defaults
pub const DEFAULT_K: usize = 10;
pub const DEFAULT_REPORT_LIMIT: usize = 5;
pub const DISTANCE_DECIMALS: i32 = 2;
pub const METERS_PER_KM: f64 = 1000.0;

// WGS-84 degree ranges
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

// Bounding box preset
pub const COLOMBIA_MIN_LAT: f64 = -5.0;
pub const COLOMBIA_MAX_LAT: f64 = 15.0;
pub const COLOMBIA_MIN_LON: f64 = -85.0;
pub const COLOMBIA_MAX_LON: f64 = -65.0;

// Default column names of the farm / energy community datasets
pub const DEFAULT_SOURCE_ID_FIELD: &str = "Item";
pub const DEFAULT_SOURCE_LAT_FIELD: &str = "Latitud";
pub const DEFAULT_SOURCE_LON_FIELD: &str = "Longitud";
pub const DEFAULT_SOURCE_LABEL_FIELD: &str = "Municipio";
pub const DEFAULT_CANDIDATE_ID_FIELD: &str = "ID";
pub const DEFAULT_CANDIDATE_LAT_FIELD: &str = "y";
pub const DEFAULT_CANDIDATE_LON_FIELD: &str = "x";
pub const DEFAULT_CANDIDATE_LABEL_FIELD: &str = "Nombre de la comunidad";

// Descriptive columns carried into the detailed export
pub const DEFAULT_SOURCE_EXPORT_COLUMNS: &[&str] = &["Departamento", "Municipio"];
pub const DEFAULT_CANDIDATE_EXPORT_COLUMNS: &[&str] = &[
    "Nombre de la comunidad",
    "Departamento",
    "Municipio",
    "Potencia Estimada kWp",
    "Inversión Estimada",
];

// Export file names
pub const DETAIL_FILE_NAME: &str = "proximity_detail.csv";
pub const STATISTICS_FILE_NAME: &str = "distance_statistics.csv";
pub const ANNOTATED_SOURCES_FILE_NAME: &str = "sources_annotated.csv";
pub const RELATED_CANDIDATES_COLUMN: &str = "related_candidates";
