//! Terminal bar chart for per-subject study time.

const FULL_BLOCK: char = '█';

/// Render a horizontal bar chart of `(label, value)` pairs.
///
/// Labels longer than `label_width` are cut with `...`; bars are scaled so
/// the largest value spans `bar_width` cells.
#[must_use]
pub fn render_bar_chart(data: &[(String, u32)], label_width: usize, bar_width: usize) -> String {
    if data.is_empty() {
        return String::new();
    }

    let max_value = data.iter().map(|(_, v)| *v).max().unwrap_or(1).max(1);

    data.iter()
        .map(|(label, value)| {
            let label = fit_label(label, label_width);
            let filled = (u64::from(*value) * bar_width as u64 / u64::from(max_value)) as usize;
            format!(
                "{label} |{}{} {value}",
                FULL_BLOCK.to_string().repeat(filled),
                " ".repeat(bar_width.saturating_sub(filled))
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn fit_label(label: &str, width: usize) -> String {
    let chars = label.chars().count();
    if chars <= width {
        return format!("{label:width$}");
    }
    let keep = width.saturating_sub(3);
    format!("{}...", label.chars().take(keep).collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_chart() {
        assert_eq!(render_bar_chart(&[], 10, 10), "");
    }

    #[test]
    fn test_bars_scale_to_largest() {
        let chart = render_bar_chart(
            &[("Math".to_string(), 100), ("Art".to_string(), 50)],
            6,
            10,
        );
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines[0], "Math   |██████████ 100");
        assert_eq!(lines[1], "Art    |█████      50");
    }

    #[test]
    fn test_long_label_truncated() {
        let chart = render_bar_chart(&[("Organic Chemistry".to_string(), 5)], 8, 4);
        assert!(chart.starts_with("Organ... |"));
    }
}
