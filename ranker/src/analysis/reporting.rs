use crate::analysis::statistics::DistanceSummary;
use crate::core::validator::ValidationReport;
use crate::models::proximity_result::SourceRanking;
use crate::models::site::Site;
use crate::data::poi::POI;

const NAME_WIDTH: usize = 50;

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let cut: String = text.chars().take(width).collect();
        format!("{}...", cut)
    }
}

/// One block per source listing its `limit` nearest candidates.
pub fn format_source_ranking(
    ranking: &SourceRanking,
    source: &Site,
    candidates: &[Site],
    source_label: Option<&str>,
    candidate_label: Option<&str>,
    limit: usize,
) -> String {
    let mut out = match source_label.and_then(|label| source.get_attribute(label)) {
        Some(place) => format!("Source {} ({}):\n", ranking.source_id, place),
        None => format!("Source {}:\n", ranking.source_id),
    };

    if ranking.is_empty() {
        out.push_str("  No candidates ranked\n");
        return out;
    }

    out.push_str("  Nearest candidates:\n");
    for result in ranking.results.iter().take(limit) {
        let name = candidate_label
            .and_then(|label| candidates.get(result.candidate_index)?.get_attribute(label))
            .map(|name| format!(": {}", truncate(name, NAME_WIDTH)))
            .unwrap_or_default();
        out.push_str(&format!(
            "    {}. ID {}{} ({:.2} km)\n",
            result.rank, result.candidate_id, name, result.distance_km
        ));
    }
    out
}

pub fn print_source_rankings(
    rankings: &[SourceRanking],
    sources: &[Site],
    candidates: &[Site],
    source_label: Option<&str>,
    candidate_label: Option<&str>,
    limit: usize,
) {
    for ranking in rankings {
        if let Some(source) = sources.get(ranking.source_index) {
            println!(
                "{}",
                format_source_ranking(ranking, source, candidates, source_label, candidate_label, limit)
            );
        }
    }
}

pub fn format_summary<S: POI, C: POI>(
    summary: Option<&DistanceSummary>,
    sources: &ValidationReport<S>,
    candidates: &ValidationReport<C>,
) -> String {
    let mut out = String::from("\n=== PROXIMITY SUMMARY ===\n");
    out.push_str(&format!(
        "Sources analysed: {} ({} of {} rejected)\n",
        sources.valid_count(),
        sources.invalid_count,
        sources.total
    ));
    out.push_str(&format!(
        "Candidates available: {} ({} of {} rejected)\n",
        candidates.valid_count(),
        candidates.invalid_count,
        candidates.total
    ));

    match summary {
        Some(summary) => {
            out.push_str(&format!("Ranked rows: {}\n", summary.rows));
            out.push_str(&format!("Mean distance: {:.2} km\n", summary.mean_km));
            out.push_str(&format!("Minimum distance: {:.2} km\n", summary.min_km));
            out.push_str(&format!("Maximum ranked distance: {:.2} km\n", summary.max_km));
        }
        None => {
            out.push_str("No proximity results: there were no valid sources or no valid candidates.\n");
        }
    }
    out
}

pub fn print_summary<S: POI, C: POI>(
    summary: Option<&DistanceSummary>,
    sources: &ValidationReport<S>,
    candidates: &ValidationReport<C>,
) {
    print!("{}", format_summary(summary, sources, candidates));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::proximity_result::ProximityResult;

    fn result(rank: usize, candidate_id: &str, distance_km: f64, candidate_index: usize) -> ProximityResult {
        ProximityResult {
            source_id: "F1".to_string(),
            candidate_id: candidate_id.to_string(),
            rank,
            distance_km,
            candidate_index,
        }
    }

    #[test]
    fn formats_nearest_candidates() {
        let source = Site::at("F1", 4.0, -74.0).with_attribute("Municipio", "Girardot");
        let long_name = "Comunidad energetica con un nombre bastante largo para la tabla";
        let candidates = vec![
            Site::at("C1", 4.0, -74.0).with_attribute("Nombre", "Vereda El Sol"),
            Site::at("C2", 5.0, -74.0).with_attribute("Nombre", long_name),
        ];
        let ranking = SourceRanking {
            source_id: "F1".to_string(),
            source_index: 0,
            results: vec![result(1, "C1", 0.0, 0), result(2, "C2", 110.581, 1)],
        };

        let text = format_source_ranking(&ranking, &source, &candidates, Some("Municipio"), Some("Nombre"), 5);
        assert!(text.starts_with("Source F1 (Girardot):"));
        assert!(text.contains("1. ID C1: Vereda El Sol (0.00 km)"));
        assert!(text.contains("2. ID C2: Comunidad energetica con un nombre bastante largo ... (110.58 km)"));

        let text = format_source_ranking(&ranking, &source, &candidates, None, None, 1);
        assert!(text.contains("1. ID C1 (0.00 km)"));
        assert!(!text.contains("C2"));
    }

    #[test]
    fn empty_result_is_explicit() {
        let sources = ValidationReport::<Site> { valid: vec![Site::at("F1", 0.0, 0.0)], invalid_count: 1, total: 2 };
        let candidates = ValidationReport::<Site> { valid: Vec::new(), invalid_count: 3, total: 3 };
        let text = format_summary(None, &sources, &candidates);
        assert!(text.contains("Sources analysed: 1 (1 of 2 rejected)"));
        assert!(text.contains("Candidates available: 0 (3 of 3 rejected)"));
        assert!(text.contains("No proximity results"));
    }

    #[test]
    fn summary_lists_distances_line_by_line() {
        let sources = ValidationReport::<Site> { valid: vec![Site::at("F1", 4.0, -74.0)], invalid_count: 0, total: 1 };
        let candidates = ValidationReport::<Site> { valid: vec![Site::at("C1", 5.0, -74.0)], invalid_count: 1, total: 2 };
        let summary = DistanceSummary { sources: 1, rows: 1, mean_km: 110.581, min_km: 110.581, max_km: 110.581 };

        let text = format_summary(Some(&summary), &sources, &candidates);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "",
                "=== PROXIMITY SUMMARY ===",
                "Sources analysed: 1 (0 of 1 rejected)",
                "Candidates available: 1 (1 of 2 rejected)",
                "Ranked rows: 1",
                "Mean distance: 110.58 km",
                "Minimum distance: 110.58 km",
                "Maximum ranked distance: 110.58 km",
            ]
        );
    }

    #[test]
    fn source_without_results() {
        let source = Site::at("F9", 4.0, -74.0);
        let ranking = SourceRanking { source_id: "F9".to_string(), source_index: 0, results: Vec::new() };
        let text = format_source_ranking(&ranking, &source, &[], Some("Municipio"), None, 5);
        assert_eq!(text, "Source F9:\n  No candidates ranked\n");
    }
}
