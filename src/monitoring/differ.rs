use serde::{Deserialize, Serialize};
use similar::{Algorithm, DiffTag, capture_diff_slices};

/// Cap on representative added/removed lines retained for analysis.
const SAMPLE_LINES: usize = 10;

/// Quantitative result of comparing two snapshots of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeMetrics {
    pub has_changes: bool,
    pub changes_count: usize,
    pub added_lines: Vec<String>,
    pub removed_lines: Vec<String>,
    pub change_percentage: f64,
    pub summary: String,
}

/// Compares two page contents line by line and derives change metrics.
///
/// Blank and whitespace-only lines are ignored both when counting and when
/// collecting sample lines. The change percentage is relative to the old
/// content's line count, with a divisor floor of 1 so a first-ever check
/// (empty baseline) never divides by zero.
pub fn compare_content(old_content: &str, new_content: &str) -> ChangeMetrics {
    let old_lines: Vec<&str> = old_content.lines().collect();
    let new_lines: Vec<&str> = new_content.lines().collect();

    let ops = capture_diff_slices(Algorithm::Myers, &old_lines, &new_lines);

    let mut added_lines = Vec::new();
    let mut removed_lines = Vec::new();
    let mut changes_count = 0usize;

    for op in &ops {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        if matches!(tag, DiffTag::Delete | DiffTag::Replace) {
            for line in &old_lines[old_range] {
                if line.trim().is_empty() {
                    continue;
                }
                changes_count += 1;
                removed_lines.push((*line).to_string());
            }
        }
        if matches!(tag, DiffTag::Insert | DiffTag::Replace) {
            for line in &new_lines[new_range] {
                if line.trim().is_empty() {
                    continue;
                }
                changes_count += 1;
                added_lines.push((*line).to_string());
            }
        }
    }

    let old_line_count = if old_content.is_empty() {
        0
    } else {
        old_content.split('\n').count()
    };
    let change_percentage =
        (changes_count as f64 / old_line_count.max(1) as f64 * 100.0 * 100.0).round() / 100.0;

    let summary = if changes_count == 0 {
        "no changes"
    } else if change_percentage < 5.0 {
        "minor changes"
    } else if change_percentage < 20.0 {
        "moderate changes"
    } else {
        "major changes"
    };

    added_lines.truncate(SAMPLE_LINES);
    removed_lines.truncate(SAMPLE_LINES);

    ChangeMetrics {
        has_changes: changes_count > 0,
        changes_count,
        added_lines,
        removed_lines,
        change_percentage,
        summary: summary.to_string(),
    }
}
