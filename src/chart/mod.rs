//! SVG line chart of one recipe's history.

use crate::db::HistoryRow;
use crate::domain::{Money, TimeMs};
use std::fmt::Write;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 400.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 50.0;

const SELL_COLOR: &str = "#2e7d32";
const COST_COLOR: &str = "#c62828";

/// Values in gold, one per row, in row order.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: &'static str,
    pub color: &'static str,
    pub values: Vec<f64>,
}

impl Series {
    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
    }
}

/// Sell and crafting cost series in gold.
pub fn history_series(rows: &[HistoryRow]) -> [Series; 2] {
    let gold = |f: fn(&HistoryRow) -> Money| -> Vec<f64> {
        rows.iter().map(|r| f(r).as_gold_f64()).collect()
    };
    [
        Series {
            label: "Sell",
            color: SELL_COLOR,
            values: gold(|r| r.sell.to_money()),
        },
        Series {
            label: "Crafting cost",
            color: COST_COLOR,
            values: gold(|r| r.crafting_cost.to_money()),
        },
    ]
}

struct Frame {
    t_min: i64,
    t_max: i64,
    y_min: f64,
    y_max: f64,
}

impl Frame {
    fn x(&self, t: TimeMs) -> f64 {
        let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        if self.t_max == self.t_min {
            return MARGIN_LEFT + plot_w / 2.0;
        }
        let frac = (t.as_ms() - self.t_min) as f64 / (self.t_max - self.t_min) as f64;
        MARGIN_LEFT + frac * plot_w
    }

    fn y(&self, value: f64) -> f64 {
        let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let frac = (value - self.y_min) / (self.y_max - self.y_min);
        HEIGHT - MARGIN_BOTTOM - frac * plot_h
    }
}

/// Render rows as an SVG document.
///
/// Returns `None` for an empty history.
pub fn render_history_chart(rows: &[HistoryRow], title: &str) -> Option<String> {
    let (first, last) = (rows.first()?, rows.last()?);
    let series = history_series(rows);

    let (mut y_min, mut y_max) = series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    let pad = ((y_max - y_min) * 0.05).max(0.5);
    y_min -= pad;
    y_max += pad;

    let frame = Frame {
        t_min: first.timestamp.as_ms(),
        t_max: last.timestamp.as_ms(),
        y_min,
        y_max,
    };

    let mut svg = String::new();
    // Writing into a String cannot fail.
    let _ = write_chart(&mut svg, rows, &series, &frame, title);
    Some(svg)
}

fn write_chart(
    svg: &mut String,
    rows: &[HistoryRow],
    series: &[Series],
    frame: &Frame,
    title: &str,
) -> std::fmt::Result {
    let bottom = HEIGHT - MARGIN_BOTTOM;
    let right = WIDTH - MARGIN_RIGHT;

    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif" font-size="12">"#
    )?;
    writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
    writeln!(
        svg,
        r#"<text x="{}" y="24" text-anchor="middle" font-size="16">{}</text>"#,
        WIDTH / 2.0,
        escape_xml(title)
    )?;

    // Axes
    writeln!(
        svg,
        r#"<path d="M{MARGIN_LEFT} {MARGIN_TOP} V{bottom} H{right}" stroke="black" fill="none"/>"#
    )?;
    for value in [frame.y_min, (frame.y_min + frame.y_max) / 2.0, frame.y_max] {
        writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{:.2}g</text>"#,
            MARGIN_LEFT - 6.0,
            frame.y(value) + 4.0,
            value
        )?;
    }
    writeln!(
        svg,
        r#"<text x="{MARGIN_LEFT}" y="{:.1}">{}</text>"#,
        bottom + 20.0,
        rows[0].timestamp.format_minutes()
    )?;
    writeln!(
        svg,
        r#"<text x="{right}" y="{:.1}" text-anchor="end">{}</text>"#,
        bottom + 20.0,
        rows[rows.len() - 1].timestamp.format_minutes()
    )?;

    for (i, s) in series.iter().enumerate() {
        let points = rows
            .iter()
            .zip(&s.values)
            .map(|(row, v)| format!("{:.1},{:.1}", frame.x(row.timestamp), frame.y(*v)))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(
            svg,
            r#"<polyline points="{points}" stroke="{}" stroke-width="2" fill="none"/>"#,
            s.color
        )?;

        if let Some(mean) = s.mean() {
            let y = frame.y(mean);
            writeln!(
                svg,
                r#"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{right}" y2="{y:.1}" stroke="{}" stroke-dasharray="6 4"/>"#,
                s.color
            )?;
        }

        let legend_y = HEIGHT - 12.0;
        let legend_x = MARGIN_LEFT + 180.0 * i as f64;
        writeln!(
            svg,
            r#"<rect x="{legend_x}" y="{:.1}" width="12" height="12" fill="{}"/>"#,
            legend_y - 10.0,
            s.color
        )?;
        writeln!(
            svg,
            r#"<text x="{:.1}" y="{legend_y}">{} (mean {:.2}g)</text>"#,
            legend_x + 16.0,
            s.label,
            s.mean().unwrap_or_default()
        )?;
    }

    writeln!(svg, "</svg>")
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
