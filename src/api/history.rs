use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::chart::render_history_chart;
use crate::db::HistoryRow;
use crate::domain::TimeMs;
use crate::error::AppError;

pub const DEFAULT_CHART_HOURS: i64 = 24;
const MS_PER_HOUR: i64 = 3_600_000;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub from_ms: Option<i64>,
    pub to_ms: Option<i64>,
    pub format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HoursQuery {
    pub hours: Option<i64>,
}

/// One stored row, columns as persisted.
#[derive(Debug, Serialize)]
pub struct HistoryRowDto {
    pub id: i64,
    pub timestamp: i64,
    pub crafting_cost_g: i64,
    pub crafting_cost_s: i64,
    pub crafting_cost_c: i64,
    pub sell_g: i64,
    pub sell_s: i64,
    pub sell_c: i64,
}

impl From<&HistoryRow> for HistoryRowDto {
    fn from(row: &HistoryRow) -> Self {
        Self {
            id: row.id,
            timestamp: row.timestamp.as_ms(),
            crafting_cost_g: row.crafting_cost.gold,
            crafting_cost_s: row.crafting_cost.silver,
            crafting_cost_c: row.crafting_cost.copper,
            sell_g: row.sell.gold,
            sell_s: row.sell.silver,
            sell_c: row.sell.copper,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub recipe: String,
    pub rows: Vec<HistoryRowDto>,
}

#[derive(Debug, Serialize)]
pub struct ChartResponse {
    pub recipe: String,
    pub hours: i64,
    pub points: usize,
    /// `None` when the window holds no rows.
    pub svg: Option<String>,
}

pub async fn get_history(
    Path(recipe): Path<String>,
    Query(params): Query<HistoryQuery>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let from_ms = params.from_ms.map(TimeMs::new);
    let to_ms = params.to_ms.map(TimeMs::new);
    if let (Some(from), Some(to)) = (from_ms, to_ms) {
        if from > to {
            return Err(AppError::BadRequest("fromMs must not exceed toMs".into()));
        }
    }

    let rows = state.repo.query_history(&recipe, from_ms, to_ms).await?;
    let rows: Vec<HistoryRowDto> = rows.iter().map(HistoryRowDto::from).collect();

    match params.format.as_deref() {
        None | Some("json") => Ok(Json(HistoryResponse { recipe, rows }).into_response()),
        Some("csv") => {
            let body = rows_to_csv(&rows)?;
            Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], body).into_response())
        }
        Some(other) => Err(AppError::BadRequest(format!(
            "unsupported format: {}",
            other
        ))),
    }
}

pub async fn get_chart(
    Path(recipe): Path<String>,
    Query(params): Query<HoursQuery>,
    State(state): State<AppState>,
) -> Result<Json<ChartResponse>, AppError> {
    let hours = params.hours.unwrap_or(DEFAULT_CHART_HOURS);
    let rows = recent_rows(&state, &recipe, hours).await?;
    let svg = render_history_chart(&rows, &chart_title(&state, &recipe));

    Ok(Json(ChartResponse {
        recipe,
        hours,
        points: rows.len(),
        svg,
    }))
}

/// Rows from the last `hours`, oldest first.
pub(crate) async fn recent_rows(
    state: &AppState,
    recipe: &str,
    hours: i64,
) -> Result<Vec<HistoryRow>, AppError> {
    if hours <= 0 {
        return Err(AppError::BadRequest("hours must be positive".into()));
    }
    let since = TimeMs::now().saturating_sub_ms(hours.saturating_mul(MS_PER_HOUR));
    Ok(state.repo.query_history(recipe, Some(since), None).await?)
}

pub(crate) fn chart_title(state: &AppState, recipe: &str) -> String {
    state
        .catalog()
        .get(recipe)
        .map(|r| r.title.to_string())
        .unwrap_or_else(|| recipe.to_string())
}

fn rows_to_csv(rows: &[HistoryRowDto]) -> Result<String, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::Internal(e.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(e.to_string()))
}
