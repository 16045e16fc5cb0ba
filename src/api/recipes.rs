use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use super::AppState;
use crate::domain::MoneyFields;
use crate::error::AppError;
use crate::recipes::KindTag;

#[derive(Debug, Serialize)]
pub struct RecipesResponse {
    pub recipes: Vec<RecipeDto>,
}

#[derive(Debug, Serialize)]
pub struct RecipeDto {
    pub slug: &'static str,
    pub title: &'static str,
    pub kind: KindTag,
    pub trackable: bool,
}

pub async fn list_recipes(State(state): State<AppState>) -> Json<RecipesResponse> {
    let recipes = state
        .catalog()
        .iter()
        .map(|r| RecipeDto {
            slug: r.slug,
            title: r.title,
            kind: r.kind_tag(),
            trackable: r.is_trackable(),
        })
        .collect();

    Json(RecipesResponse { recipes })
}

/// Evaluate one recipe against fresh prices.
///
/// Responds with a flat `<field>_g/_s/_c` map.
pub async fn get_recipe(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MoneyFields>, AppError> {
    let evaluation = state.evaluator.evaluate(&slug).await?;
    Ok(Json(evaluation.fields))
}
