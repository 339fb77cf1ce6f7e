//! End-of-run summary reports.

use crate::config::ReportFormat;
use crate::error::Result;
use crate::models::CleaningStats;

use colored::*;
use indicatif::HumanDuration;
use std::fmt::Write as _;
use tracing::info;

/// Print the final report for a run in the requested format
pub fn generate_report(format: ReportFormat, stats: &CleaningStats) -> Result<()> {
    info!("Generating final report");

    let report = match format {
        ReportFormat::Human => render_human(stats),
        ReportFormat::Json => render_json(stats)?,
        ReportFormat::Csv => render_csv(stats),
    };
    print!("{report}");
    Ok(())
}

/// Human-readable report
pub fn render_human(stats: &CleaningStats) -> String {
    let mode = stats.mode;
    let mut out = String::new();

    let _ = writeln!(out, "\n{}", "Cleaning complete".bright_green().bold());
    let _ = writeln!(
        out,
        "Of {} records parsed, {} were retained and {} were excluded.",
        stats.records_processed, stats.retained, stats.excluded
    );
    let _ = writeln!(
        out,
        "  {} records excluded for insufficient precision",
        stats.imprecise
    );

    if mode.needs_bad_coordinates() {
        let _ = writeln!(
            out,
            "  {} records excluded for matching bad coordinates",
            stats.coordinate_matches()
        );
        if mode.uses_rounding() {
            let _ = writeln!(out, "    {} by number rounding", stats.rounding_matches);
        }
        if mode.uses_string_matching() {
            let _ = writeln!(out, "    {} by string matching", stats.string_matches);
        }
        let _ = writeln!(
            out,
            "  {} bad coordinates loaded",
            stats.bad_coordinates_loaded
        );
    }

    if stats.malformed > 0 {
        let _ = writeln!(
            out,
            "{} {} malformed lines skipped",
            "Warning:".yellow(),
            stats.malformed
        );
        for message in &stats.error_messages {
            let _ = writeln!(out, "    {message}");
        }
    }
    if stats.bad_coordinate_lines_skipped > 0 {
        let _ = writeln!(
            out,
            "{} {} unusable bad-coordinate lines skipped",
            "Warning:".yellow(),
            stats.bad_coordinate_lines_skipped
        );
    }

    let _ = writeln!(
        out,
        "Processing time: {}",
        HumanDuration(stats.processing_time)
    );
    out.push('\n');
    out
}

/// JSON report for machine consumption
pub fn render_json(stats: &CleaningStats) -> Result<String> {
    let json_stats = serde_json::json!({
        "mode": stats.mode,
        "records_processed": stats.records_processed,
        "retained": stats.retained,
        "excluded": stats.excluded,
        "imprecise": stats.imprecise,
        "coordinate_matches": stats.coordinate_matches(),
        "rounding_matches": stats.rounding_matches,
        "string_matches": stats.string_matches,
        "malformed": stats.malformed,
        "bad_coordinates_loaded": stats.bad_coordinates_loaded,
        "processing_time_seconds": stats.processing_time.as_secs_f64(),
        "errors": stats.error_messages,
    });

    let mut rendered = serde_json::to_string_pretty(&json_stats)?;
    rendered.push('\n');
    Ok(rendered)
}

/// CSV report for data analysis
pub fn render_csv(stats: &CleaningStats) -> String {
    let rows = [
        ("records_processed", stats.records_processed.to_string()),
        ("retained", stats.retained.to_string()),
        ("excluded", stats.excluded.to_string()),
        ("imprecise", stats.imprecise.to_string()),
        ("coordinate_matches", stats.coordinate_matches().to_string()),
        ("rounding_matches", stats.rounding_matches.to_string()),
        ("string_matches", stats.string_matches.to_string()),
        ("malformed", stats.malformed.to_string()),
        ("bad_coordinates_loaded", stats.bad_coordinates_loaded.to_string()),
        (
            "processing_time_seconds",
            stats.processing_time.as_secs_f64().to_string(),
        ),
    ];

    let mut out = String::from("metric,value\n");
    for (metric, value) in rows {
        let _ = writeln!(out, "{metric},{value}");
    }
    out
}
