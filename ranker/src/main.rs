use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use proximity::analysis::{reporting, statistics};
use proximity::cli::cli::Args;
use proximity::config::ranking_config::RankingConfig;
use proximity::core::validator;
use proximity::data::sites_loader;
use proximity::utils::csv_export::CsvExporter;
use proximity::utils::logging::{self, FileIOType, OperationCategory};
use proximity::utils::progress::BarProgress;

fn load_config(args: &Args) -> Result<RankingConfig> {
    let _timing = logging::start_timing("load_config",
        OperationCategory::FileIO { subcategory: FileIOType::ConfigLoad });

    let base = match args.config() {
        Some(path) => RankingConfig::from_file(path)
            .with_context(|| format!("Failed to read config file {}", path))?,
        None => RankingConfig::default(),
    };
    let config = args.apply_to(base)?;
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_logging(args.enable_timing());

    // Configuration errors abort before any data is touched
    let config = load_config(&args)?;
    let ranker = config.build_ranker()?;

    if let Some(threads) = config.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure the worker pool")?;
    }

    info!(
        k = ranker.k(),
        strategy = %ranker.metric(),
        bounding_box = ?config.bounding_box,
        "Proximity analysis starting"
    );

    let source_fields = config.field_names.source_fields();
    let candidate_fields = config.field_names.candidate_fields();

    let source_table = sites_loader::load_table(args.sources(), &source_fields, "source")
        .with_context(|| format!("Failed to load sources from {}", args.sources()))?;
    let all_candidates = sites_loader::load_sites(args.candidates(), &candidate_fields, "candidate")
        .with_context(|| format!("Failed to load candidates from {}", args.candidates()))?;

    let (source_report, candidate_report) = {
        let _timing = logging::start_timing("validate", OperationCategory::Validation);
        let bbox = config.bounding_box.as_ref();
        (
            validator::validate(source_table.sites.clone(), bbox),
            validator::validate(all_candidates, bbox),
        )
    };
    source_report.log_summary("source");
    candidate_report.log_summary("candidate");

    if source_report.valid.is_empty() {
        warn!("No valid sources; the ranking will be empty");
    }
    if candidate_report.valid.is_empty() {
        warn!("No valid candidates; every source will get an empty ranking");
    }

    let ranker = if args.show_progress() {
        ranker.with_progress(Arc::new(BarProgress::new(source_report.valid.len())))
    } else {
        ranker
    };

    let rankings = ranker.rank(&source_report.valid, &candidate_report.valid)?;

    let (per_source, summary) = {
        let _timing = logging::start_timing("statistics", OperationCategory::Analysis);
        (statistics::per_source_stats(&rankings), statistics::summarize(&rankings))
    };

    reporting::print_source_rankings(
        &rankings,
        &source_report.valid,
        &candidate_report.valid,
        config.field_names.source_label.as_deref(),
        config.field_names.candidate_label.as_deref(),
        args.report_limit(),
    );
    reporting::print_summary(summary.as_ref(), &source_report, &candidate_report);

    let exporter = CsvExporter::new(args.output_dir(), args.timestamped())
        .with_context(|| format!("Failed to create output directory {}", args.output_dir()))?;
    let written = [
        exporter.export_detail(&rankings, &source_report.valid, &candidate_report.valid, &config.export_columns)?,
        exporter.export_statistics(&per_source)?,
        exporter.export_annotated_sources(&source_table, &rankings)?,
    ];

    println!("\nFiles written to {}:", exporter.output_dir().display());
    for path in &written {
        if let Some(name) = path.file_name() {
            println!("- {}", name.to_string_lossy());
        }
    }

    logging::print_timing_report();

    Ok(())
}
