//! Text versions of the dashboard's bar and pie charts.

use crate::types::ReportCombination;

const BAR_GLYPH: char = '█';

/// One slice of the pie chart
#[derive(Debug, Clone, PartialEq)]
pub struct Share {
    pub label: String,
    pub count: i64,
    /// Percentage of the total, 0.0 when the total is zero
    pub percent: f64,
}

/// Percentage share of each combination; negative counts are treated as zero
pub fn pie_shares(combinations: &[ReportCombination]) -> Vec<Share> {
    let total: i64 = combinations.iter().map(|c| c.report_count.max(0)).sum();
    combinations
        .iter()
        .map(|c| {
            let count = c.report_count.max(0);
            let percent = if total == 0 {
                0.0
            } else {
                count as f64 * 100.0 / total as f64
            };
            Share {
                label: c.report_combination.clone(),
                count,
                percent,
            }
        })
        .collect()
}

/// One line per share, e.g. `Fresh Term Loan   42.9% (3)`
pub fn render_shares(shares: &[Share]) -> String {
    let label_width = shares.iter().map(|s| s.label.chars().count()).max().unwrap_or(0);
    shares
        .iter()
        .map(|s| {
            format!(
                "{:<width$}  {:>5.1}% ({})",
                s.label,
                s.percent,
                s.count,
                width = label_width
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Horizontal bar chart scaled so the largest count fills `width` glyphs
pub fn bar_chart(combinations: &[ReportCombination], width: usize) -> String {
    let max = combinations.iter().map(|c| c.report_count.max(0)).max().unwrap_or(0);
    let label_width = combinations
        .iter()
        .map(|c| c.report_combination.chars().count())
        .max()
        .unwrap_or(0);

    combinations
        .iter()
        .map(|c| {
            let count = c.report_count.max(0);
            let bar_len = bar_length(count, max, width);
            format!(
                "{:<label_width$} │{} {}",
                c.report_combination,
                BAR_GLYPH.to_string().repeat(bar_len),
                count
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn bar_length(count: i64, max: i64, width: usize) -> usize {
    if max <= 0 || count <= 0 {
        return 0;
    }
    let scaled = (count as f64 / max as f64 * width as f64).round() as usize;
    // Any non-zero count stays visible
    scaled.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combo(label: &str, count: i64) -> ReportCombination {
        ReportCombination {
            report_combination: label.to_string(),
            report_count: count,
        }
    }

    #[test]
    fn test_pie_shares_sum_to_hundred() {
        let shares = pie_shares(&[combo("Takeover", 1), combo("Fresh OD", 3)]);
        assert_eq!(shares[0].percent, 25.0);
        assert_eq!(shares[1].percent, 75.0);
        let total: f64 = shares.iter().map(|s| s.percent).sum();
        assert!((total - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pie_shares_of_empty_total() {
        let shares = pie_shares(&[combo("Takeover", 0)]);
        assert_eq!(shares[0].percent, 0.0);
        assert!(pie_shares(&[]).is_empty());
    }

    #[test]
    fn test_render_shares_line() {
        let text = render_shares(&pie_shares(&[combo("A", 1), combo("Bigger", 1)]));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "A        50.0% (1)");
        assert_eq!(lines[1], "Bigger   50.0% (1)");
    }

    #[test]
    fn test_bar_chart_scales_to_width() {
        let chart = bar_chart(&[combo("A", 10), combo("B", 5), combo("C", 0)], 20);
        let lines: Vec<&str> = chart.lines().collect();

        assert_eq!(lines[0].matches(BAR_GLYPH).count(), 20);
        assert_eq!(lines[1].matches(BAR_GLYPH).count(), 10);
        assert_eq!(lines[2].matches(BAR_GLYPH).count(), 0);
        assert!(lines[1].ends_with(" 5"));
    }

    #[test]
    fn test_small_counts_remain_visible() {
        assert_eq!(bar_length(1, 1000, 40), 1);
    }
}
