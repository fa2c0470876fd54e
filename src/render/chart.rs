//! SVG error-bar chart for one compared column.
//!
//! Each group gets a point at its mean with `±1.96·se` error bars, a shaded
//! band over its t-based confidence interval and a dashed line at the mean.

use crate::domain::model::{ColumnComparison, ConfidenceInterval};
use svg::node::element::{Circle, Line, Rectangle, Text};
use svg::{Document, Node};

const WIDTH: f64 = 480.0;
const HEIGHT: f64 = 360.0;
const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 48.0;
const Z_95: f64 = 1.96;

const CONTROL_COLOR: &str = "#1f77b4";
const TREATMENT_COLOR: &str = "#ff7f0e";

struct Group<'a> {
    name: &'static str,
    color: &'static str,
    x: f64,
    ci: &'a ConfidenceInterval,
}

impl Group<'_> {
    fn error_low(&self) -> f64 {
        self.ci.mean - Z_95 * self.ci.standard_error
    }

    fn error_high(&self) -> f64 {
        self.ci.mean + Z_95 * self.ci.standard_error
    }
}

struct YScale {
    min: f64,
    max: f64,
}

impl YScale {
    fn fit(groups: &[Group]) -> Self {
        let low = groups
            .iter()
            .map(|g| g.ci.lower_bound.min(g.error_low()))
            .fold(f64::INFINITY, f64::min);
        let high = groups
            .iter()
            .map(|g| g.ci.upper_bound.max(g.error_high()))
            .fold(f64::NEG_INFINITY, f64::max);

        let span = high - low;
        // 區間退化時 (常數樣本) 仍需可見的縱軸範圍
        let pad = if span > 0.0 { span * 0.1 } else { low.abs().max(1.0) * 0.1 };
        Self {
            min: low - pad,
            max: high + pad,
        }
    }

    fn to_px(&self, value: f64) -> f64 {
        let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        MARGIN_TOP + (self.max - value) / (self.max - self.min) * plot_height
    }
}

fn dashed_line(x1: f64, x2: f64, y: f64, color: &str) -> Line {
    Line::new()
        .set("x1", x1)
        .set("y1", y)
        .set("x2", x2)
        .set("y2", y)
        .set("stroke", color)
        .set("stroke-dasharray", "6 4")
}

fn solid_line(x1: f64, y1: f64, x2: f64, y2: f64, color: &str) -> Line {
    Line::new()
        .set("x1", x1)
        .set("y1", y1)
        .set("x2", x2)
        .set("y2", y2)
        .set("stroke", color)
}

pub fn render_svg(comparison: &ColumnComparison) -> String {
    let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let groups = [
        Group {
            name: "Control",
            color: CONTROL_COLOR,
            x: MARGIN_LEFT + plot_width * 0.25,
            ci: &comparison.control,
        },
        Group {
            name: "Treatment",
            color: TREATMENT_COLOR,
            x: MARGIN_LEFT + plot_width * 0.75,
            ci: &comparison.treatment,
        },
    ];
    let scale = YScale::fit(&groups);
    let left = MARGIN_LEFT;
    let right = WIDTH - MARGIN_RIGHT;
    let bottom = HEIGHT - MARGIN_BOTTOM;

    let mut document = Document::new()
        .set("width", WIDTH)
        .set("height", HEIGHT)
        .set("viewBox", (0, 0, WIDTH, HEIGHT))
        .set("font-family", "sans-serif")
        .set("font-size", 12)
        .add(
            Text::new(format!("Confidence Interval Plot: {}", comparison.column))
                .set("x", WIDTH / 2.0)
                .set("y", 24)
                .set("text-anchor", "middle")
                .set("font-size", 14),
        );

    // 信賴區間色帶
    for group in &groups {
        let top = scale.to_px(group.ci.upper_bound);
        let height = scale.to_px(group.ci.lower_bound) - top;
        document.append(
            Rectangle::new()
                .set("x", left)
                .set("y", top)
                .set("width", plot_width)
                .set("height", height)
                .set("fill", group.color)
                .set("fill-opacity", 0.1),
        );
    }

    // 平均值參考線
    for group in &groups {
        document.append(dashed_line(left, right, scale.to_px(group.ci.mean), group.color));
    }

    document.append(solid_line(left, MARGIN_TOP, left, bottom, "black"));
    document.append(solid_line(left, bottom, right, bottom, "black"));

    for (value, anchor) in [(scale.max, MARGIN_TOP), (scale.min, bottom)] {
        document.append(
            Text::new(format!("{:.3}", value))
                .set("x", left - 6.0)
                .set("y", anchor + 4.0)
                .set("text-anchor", "end"),
        );
    }

    for group in &groups {
        let y_low = scale.to_px(group.error_low());
        let y_high = scale.to_px(group.error_high());
        let (cap_left, cap_right) = (group.x - 5.0, group.x + 5.0);

        document.append(solid_line(group.x, y_low, group.x, y_high, group.color));
        document.append(solid_line(cap_left, y_low, cap_right, y_low, group.color));
        document.append(solid_line(cap_left, y_high, cap_right, y_high, group.color));
        document.append(
            Circle::new()
                .set("cx", group.x)
                .set("cy", scale.to_px(group.ci.mean))
                .set("r", 4)
                .set("fill", group.color),
        );
        document.append(
            Text::new(group.name)
                .set("x", group.x)
                .set("y", bottom + 20.0)
                .set("text-anchor", "middle"),
        );
    }

    // 圖例
    for (idx, group) in groups.iter().enumerate() {
        let y = MARGIN_TOP + 12.0 + idx as f64 * 16.0;
        document.append(dashed_line(right - 130.0, right - 106.0, y, group.color));
        document.append(
            Text::new(format!("{} Mean", group.name))
                .set("x", right - 100.0)
                .set("y", y + 4.0),
        );
    }

    document.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ComparisonResult;

    fn interval(mean: f64, se: f64) -> ConfidenceInterval {
        ConfidenceInterval {
            mean,
            standard_error: se,
            lower_bound: mean - 2.0 * se,
            upper_bound: mean + 2.0 * se,
            confidence_level: 0.95,
            sample_size: 5,
            t_critical: 2.0,
        }
    }

    fn comparison(column: &str, control: ConfidenceInterval, treatment: ConfidenceInterval) -> ColumnComparison {
        ColumnComparison {
            column: column.to_string(),
            result: ComparisonResult {
                statistic: 0.0,
                p_value: 1.0,
                degrees_of_freedom: 8.0,
                mean_difference: treatment.mean - control.mean,
                alpha: 0.05,
                reject_null: false,
            },
            control,
            treatment,
        }
    }

    #[test]
    fn test_chart_has_bands_lines_and_points() {
        let svg = render_svg(&comparison("value", interval(11.0, 0.7), interval(15.4, 0.5)));

        assert!(svg.contains("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<circle").count(), 2);
        assert_eq!(svg.matches("fill-opacity=\"0.1\"").count(), 2);
        assert!(svg.matches("stroke-dasharray").count() >= 2);
        assert!(svg.contains("Control Mean"));
        assert!(svg.contains("Treatment Mean"));
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_higher_mean_is_drawn_higher() {
        let c = comparison("value", interval(11.0, 0.7), interval(15.4, 0.5));
        let groups = [
            Group { name: "Control", color: CONTROL_COLOR, x: 0.0, ci: &c.control },
            Group { name: "Treatment", color: TREATMENT_COLOR, x: 0.0, ci: &c.treatment },
        ];
        let scale = YScale::fit(&groups);
        assert!(scale.to_px(15.4) < scale.to_px(11.0));
    }

    #[test]
    fn test_degenerate_intervals_render() {
        let svg = render_svg(&comparison("flat", interval(10.0, 0.0), interval(10.0, 0.0)));
        assert!(!svg.contains("NaN"));
        assert_eq!(svg.matches("<circle").count(), 2);
    }

    #[test]
    fn test_column_name_is_escaped() {
        let svg = render_svg(&comparison("a<b & c", interval(1.0, 0.1), interval(2.0, 0.1)));
        assert!(svg.contains("&lt;"));
        assert!(!svg.contains("a<b"));
    }
}
