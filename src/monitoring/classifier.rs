use serde::{Deserialize, Serialize};

use super::differ::ChangeMetrics;

/// Importance tier of a detected change. Ordered so that
/// `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    Medium,
    High,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::High => "high",
            Importance::Medium => "medium",
            Importance::Low => "low",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Importance::High => "🔴",
            Importance::Medium => "🟡",
            Importance::Low => "🟢",
        }
    }
}

/// Maps change metrics to an importance tier.
///
/// The rules are ordered and first match wins; all thresholds are strict.
pub fn classify(metrics: &ChangeMetrics) -> Importance {
    if metrics.change_percentage > 20.0 || metrics.changes_count > 50 {
        return Importance::High;
    }
    if metrics.change_percentage > 5.0 || metrics.changes_count > 10 {
        return Importance::Medium;
    }
    Importance::Low
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(changes_count: usize, change_percentage: f64) -> ChangeMetrics {
        ChangeMetrics {
            has_changes: changes_count > 0,
            changes_count,
            added_lines: vec![],
            removed_lines: vec![],
            change_percentage,
            summary: String::new(),
        }
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(classify(&metrics(60, 1.0)), Importance::High);
        assert_eq!(classify(&metrics(1, 25.0)), Importance::High);
        assert_eq!(classify(&metrics(15, 1.0)), Importance::Medium);
        assert_eq!(classify(&metrics(1, 10.0)), Importance::Medium);
        assert_eq!(classify(&metrics(2, 1.0)), Importance::Low);
        assert_eq!(classify(&metrics(0, 0.0)), Importance::Low);
    }

    #[test]
    fn boundaries_are_strict() {
        // Exactly at a threshold must stay in the lower tier.
        assert_eq!(classify(&metrics(10, 0.0)), Importance::Low);
        assert_eq!(classify(&metrics(0, 5.0)), Importance::Low);
        assert_eq!(classify(&metrics(50, 0.0)), Importance::Medium);
        assert_eq!(classify(&metrics(0, 20.0)), Importance::Medium);
        // Just past a threshold moves up.
        assert_eq!(classify(&metrics(11, 0.0)), Importance::Medium);
        assert_eq!(classify(&metrics(0, 5.01)), Importance::Medium);
        assert_eq!(classify(&metrics(51, 0.0)), Importance::High);
        assert_eq!(classify(&metrics(0, 20.01)), Importance::High);
    }

    #[test]
    fn classification_is_monotonic() {
        // Increasing either metric while holding the other fixed never
        // lowers the tier.
        for pct in [0.0, 3.0, 5.0, 6.0, 20.0, 21.0, 100.0] {
            let mut last = classify(&metrics(0, pct));
            for count in [0usize, 5, 10, 11, 50, 51, 200] {
                let tier = classify(&metrics(count, pct));
                assert!(tier >= last);
                last = tier;
            }
        }
        for count in [0usize, 5, 11, 51] {
            let mut last = classify(&metrics(count, 0.0));
            for pct in [0.0, 4.9, 5.1, 19.9, 20.1, 300.0] {
                let tier = classify(&metrics(count, pct));
                assert!(tier >= last);
                last = tier;
            }
        }
    }

    #[test]
    fn one_change_over_ten_lines_is_medium() {
        // 1 change over 10 old lines -> 10% -> medium.
        assert_eq!(classify(&metrics(1, 10.0)), Importance::Medium);
    }

    #[test]
    fn empty_baseline_reads_as_high() {
        // 3 added lines over an empty baseline -> 300% -> high.
        assert_eq!(classify(&metrics(3, 300.0)), Importance::High);
    }
}
