use colored::Colorize;

use crate::engine::{ConversionReport, Outcome};

/// Render per-rule outcome notices for terminal output.
pub fn render_outcomes(report: &ConversionReport) -> String {
    let mut out = Vec::new();
    for record in &report.rules {
        let line = match record.outcome {
            Outcome::Applied => format!("{} {}", "applied".green(), record.rule),
            Outcome::Skipped => format!("{} {}", "skipped".dimmed(), record.rule),
        };
        out.push(line);
    }
    out.join("\n")
}

/// Render warnings, one per line. Empty string when the run was lossless.
pub fn render_warnings(report: &ConversionReport) -> String {
    report
        .warnings()
        .map(|warning| format!("{} {}", "warning:".yellow(), warning))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the one-line conversion summary.
pub fn render_summary(report: &ConversionReport) -> String {
    format!(
        "convert_summary target={} version={} applied={} skipped={} warnings={}",
        report.target_version,
        report.normalized_version.as_deref().unwrap_or("unknown"),
        report.applied(),
        report.skipped(),
        report.warnings().count()
    )
    .cyan()
    .to_string()
}
