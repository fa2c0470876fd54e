use crate::domain::model::{AnalysisReport, ColumnComparison, ConfidenceInterval, Table};
use crate::utils::error::Result;

fn preview_lines(heading: &str, table: &Table) -> Vec<String> {
    let mut lines = vec![format!(
        "{} data ({}, {} rows, first {} shown)",
        heading,
        table.label,
        table.row_count,
        table.preview.len()
    )];
    lines.push(table.headers.join("\t"));
    for row in &table.preview {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        lines.push(cells.join("\t"));
    }
    lines
}

fn interval_line(group: &str, ci: &ConfidenceInterval) -> String {
    format!(
        "  {:<10} n = {:<5} mean = {:.4}  se = {:.4}  [{:.4}, {:.4}]",
        group, ci.sample_size, ci.mean, ci.standard_error, ci.lower_bound, ci.upper_bound
    )
}

fn comparison_lines(comparison: &ColumnComparison) -> Vec<String> {
    let result = &comparison.result;
    vec![
        format!("== {} ==", comparison.column),
        format!("T-statistic: {}", result.statistic),
        format!("P-value: {}", result.p_value),
        format!("Degrees of freedom: {}", result.degrees_of_freedom),
        format!(
            "Mean difference (treatment - control): {:.4}",
            result.mean_difference
        ),
        format!("Alpha: {}", result.alpha),
        result.conclusion().to_string(),
        String::new(),
        format!(
            "Confidence intervals ({:.0}%)",
            comparison.control.confidence_level * 100.0
        ),
        interval_line("Control", &comparison.control),
        interval_line("Treatment", &comparison.treatment),
    ]
}

/// Plain-text rendering of a full report, in reading order.
pub fn render_text(report: &AnalysisReport) -> String {
    let mut lines = vec![
        "A/B Testing Report".to_string(),
        format!("Generated at: {}", report.generated_at),
        String::new(),
    ];

    lines.extend(preview_lines("Treatment", &report.treatment));
    lines.push(String::new());
    lines.extend(preview_lines("Control", &report.control));
    lines.push(String::new());

    for comparison in &report.comparisons {
        lines.extend(comparison_lines(comparison));
        lines.push(String::new());
    }

    for section in &report.reference {
        lines.push(format!("== {} ==", section.title));
        lines.push(section.intro.clone());
        lines.push(format!("    {}", section.formula));
        lines.push("Where:".to_string());
        for definition in &section.definitions {
            lines.push(format!("- {}", definition));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

pub fn render_json(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
