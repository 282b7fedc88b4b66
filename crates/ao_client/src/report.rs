use std::fmt::Write;

use ao_sim::aggregate::{CumulativePoint, ResultsReport};
use ao_sim::heatmap::VisitHeatmap;

/// Number of trailing cumulative points printed.
pub const CUMULATIVE_TAIL: usize = 5;

const SHADES: [char; 5] = [' ', '.', ':', '+', '#'];

/// Plain-text rendering of a results report.
pub fn render_report(report: &ResultsReport<'_>) -> String {
    let mut out = String::new();

    out.push_str("Simulation Results\n\n");
    out.push_str("Summary\n");
    for row in &report.summary {
        let _ = writeln!(out, "  {:<22} {}", row.label, row.value);
    }

    if !report.proportions.is_empty() {
        out.push_str("\nAction Counts\n");
        let _ = writeln!(out, "  {:<16} {:>8} {:>11}", "Action", "Count", "Proportion");
        for p in &report.proportions {
            let _ = writeln!(out, "  {:<16} {:>8} {:>11}", p.action, p.count, p.percent_label());
        }
    }

    if let Some(rows) = &report.breakdown {
        out.push_str("\nCondition Breakdown\n");
        for row in rows {
            let counts: Vec<String> = row
                .action_counts
                .iter()
                .map(|(a, n)| format!("{a}={n}"))
                .collect();
            let _ = writeln!(
                out,
                "  {}. {:<16} steps {:>6}-{:<6} reinforced {:>6} ({})  {}",
                row.condition,
                row.label,
                row.start_step,
                row.end_step,
                row.total_reinforcements,
                row.rate_label(),
                counts.join(" ")
            );
        }
    }

    if !report.boundaries.is_empty() {
        out.push_str("\nCondition Changes\n");
        for b in &report.boundaries {
            let _ = writeln!(out, "  step {:>6}  {}", b.start_step, b.label);
        }
    }

    if !report.cumulative.is_empty() {
        out.push_str("\nCumulative Record\n");
        let skip = report.cumulative.len().saturating_sub(CUMULATIVE_TAIL);
        for point in report.cumulative.iter().skip(skip) {
            match point {
                CumulativePoint::TwoChoice { step, cum_a, cum_b } => {
                    let _ = writeln!(out, "  step {step:>6}  choice_a {cum_a:>6}  choice_b {cum_b:>6}");
                }
                CumulativePoint::Grid { step, cum_total } => {
                    let _ = writeln!(out, "  step {step:>6}  lever presses {cum_total:>6}");
                }
            }
        }
    }

    if let Some(heatmap) = &report.heatmap {
        out.push_str("\nVisit Frequency Heatmap\n");
        out.push_str(&render_heatmap(heatmap));
    }

    out
}

/// One line per grid row: a shade glyph per cell, then the raw counts.
pub fn render_heatmap(heatmap: &VisitHeatmap) -> String {
    let mut out = String::new();
    for r in 0..heatmap.rows() {
        let glyphs: String = (0..heatmap.cols())
            .map(|c| shade_glyph(heatmap.intensity(r, c).unwrap_or(0.0)))
            .collect();
        let counts: Vec<String> = heatmap
            .row(r)
            .unwrap_or(&[])
            .iter()
            .map(u64::to_string)
            .collect();
        let _ = writeln!(out, "  |{glyphs}|  {}", counts.join(" "));
    }
    let _ = writeln!(out, "  max {}", heatmap.max_count());
    out
}

fn shade_glyph(intensity: f64) -> char {
    let last = SHADES.len() - 1;
    let idx = (intensity.clamp(0.0, 1.0) * last as f64).round() as usize;
    SHADES[idx.min(last)]
}
