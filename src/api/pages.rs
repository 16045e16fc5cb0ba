use axum::extract::{Path, Query, State};
use axum::response::Html;
use std::fmt::Write;

use super::history::{chart_title, recent_rows, HoursQuery, DEFAULT_CHART_HOURS};
use super::AppState;
use crate::chart::render_history_chart;
use crate::db::HistoryRow;
use crate::error::AppError;

pub async fn index() -> Html<&'static str> {
    Html(include_str!("index.html"))
}

/// Chart plus table of the last `hours` of snapshots.
pub async fn history_page(
    Path(recipe): Path<String>,
    Query(params): Query<HoursQuery>,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let hours = params.hours.unwrap_or(DEFAULT_CHART_HOURS);
    let rows = recent_rows(&state, &recipe, hours).await?;
    let title = chart_title(&state, &recipe);
    let chart = render_history_chart(&rows, &title);

    Ok(Html(render_history_page(&title, hours, chart.as_deref(), &rows)))
}

fn render_history_page(
    title: &str,
    hours: i64,
    chart: Option<&str>,
    rows: &[HistoryRow],
) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{title} history</title>
<style>
body {{ font-family: sans-serif; margin: 2em; }}
table {{ border-collapse: collapse; }}
th, td {{ padding: 4px 12px; border-bottom: 1px solid #ddd; text-align: right; }}
</style></head>
<body>
<p><a href="/">Back</a></p>
<h1>{title}: last {hours}h</h1>
"#
    );

    match chart {
        Some(svg) => html.push_str(svg),
        None => html.push_str("<p>No data</p>\n"),
    }

    html.push_str("<table>\n");
    html.push_str("<tr><th>Time (UTC)</th><th>Crafting cost</th><th>Sell</th></tr>\n");
    for row in rows.iter().rev() {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            row.timestamp.format_minutes(),
            row.crafting_cost.to_money(),
            row.sell.to_money()
        );
    }
    html.push_str("</table>\n</body>\n</html>\n");
    html
}
