use crate::datasource::{PriceBook, PriceError, PriceSource};
use crate::domain::{Money, MoneyFields, SELLER_SHARE};
use crate::recipes::{
    Catalog, CraftingRecipe, FlipTable, IngredientPath, Recipe, RecipeKind, SalvageRecipe,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

pub const CRAFTING_COST: &str = "crafting_cost";
pub const SELL: &str = "sell";
pub const SELL_AFTER_TAX: &str = "sell_after_tax";
pub const PROFIT: &str = "profit";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("unknown recipe: {0}")]
    UnknownRecipe(String),
    #[error("recipe {0} has no ingredient paths")]
    NoPaths(String),
    #[error(transparent)]
    Price(#[from] PriceError),
}

/// Result of evaluating one recipe against one price book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub slug: &'static str,
    pub fields: MoneyFields,
}

impl Evaluation {
    pub fn crafting_cost(&self) -> Option<Money> {
        self.fields.get(CRAFTING_COST)
    }

    pub fn sell(&self) -> Option<Money> {
        self.fields.get(SELL)
    }

    pub fn profit(&self) -> Option<Money> {
        self.fields.get(PROFIT)
    }
}

/// Fetches prices for a recipe and evaluates it.
#[derive(Debug, Clone)]
pub struct Evaluator {
    source: Arc<dyn PriceSource>,
    catalog: Arc<Catalog>,
}

impl Evaluator {
    pub fn new(source: Arc<dyn PriceSource>, catalog: Arc<Catalog>) -> Self {
        Self { source, catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn shared_catalog(&self) -> Arc<Catalog> {
        self.catalog.clone()
    }

    pub fn source(&self) -> &Arc<dyn PriceSource> {
        &self.source
    }

    /// Evaluate a catalog recipe with one batched price fetch.
    pub async fn evaluate(&self, slug: &str) -> Result<Evaluation, EvalError> {
        let recipe = self
            .catalog
            .get(slug)
            .ok_or_else(|| EvalError::UnknownRecipe(slug.to_string()))?;

        let ids = recipe.item_ids();
        debug!("Evaluating recipe={} items={}", recipe.slug, ids.len());

        let book = self.source.fetch_prices(&ids).await?;
        evaluate_with(recipe, &book)
    }
}

/// Evaluate a recipe against already fetched prices.
///
/// Any missing price fails the whole evaluation.
pub fn evaluate_with(recipe: &Recipe, book: &PriceBook) -> Result<Evaluation, EvalError> {
    let fields = match &recipe.kind {
        RecipeKind::Crafting(crafting) => evaluate_crafting(recipe.slug, crafting, book)?,
        RecipeKind::Salvage(salvage) => evaluate_salvage(salvage, book)?,
        RecipeKind::Flip(table) => evaluate_flip(table, book)?,
    };
    Ok(Evaluation {
        slug: recipe.slug,
        fields,
    })
}

fn path_cost(path: &IngredientPath, book: &PriceBook) -> Result<Money, PriceError> {
    let mut cost = Money::ZERO;
    for ingredient in &path.ingredients {
        let unit = book.get(ingredient.item)?.side(ingredient.side);
        cost += unit * i64::from(ingredient.quantity);
    }
    Ok(cost)
}

fn evaluate_crafting(
    slug: &str,
    recipe: &CraftingRecipe,
    book: &PriceBook,
) -> Result<MoneyFields, EvalError> {
    let output = book.get(recipe.output)?;
    let sell = output.sell * i64::from(recipe.output_quantity);
    let sell_after_tax = sell.after_tax();
    let revenue = Money::from_decimal_trunc(
        sell.to_decimal() * SELLER_SHARE * recipe.yield_multiplier,
    );

    let mut costs = Vec::with_capacity(recipe.paths.len());
    for path in &recipe.paths {
        costs.push((path.label, path_cost(path, book)?));
    }

    let best_cost = costs
        .iter()
        .map(|(_, cost)| *cost)
        .min()
        .ok_or_else(|| EvalError::NoPaths(slug.to_string()))?;

    let mut fields = MoneyFields::new()
        .with(CRAFTING_COST, best_cost)
        .with(SELL, sell)
        .with(SELL_AFTER_TAX, sell_after_tax)
        .with(PROFIT, revenue - best_cost);

    if costs.len() > 1 {
        for (label, cost) in &costs {
            fields.push(format!("path_{}_crafting_cost", label), *cost);
            fields.push(format!("path_{}_profit", label), revenue - *cost);
        }
    }

    Ok(fields)
}

fn evaluate_salvage(recipe: &SalvageRecipe, book: &PriceBook) -> Result<MoneyFields, PriceError> {
    let stack = Decimal::from(recipe.stack_size);
    let stack_buy = book.get(recipe.stack_item)?.buy * i64::from(recipe.stack_size);
    let salvage_costs: Money = recipe.fees.iter().map(|f| f.total()).sum();

    let mut mats_value = Decimal::ZERO;
    for entry in &recipe.yields {
        let sell = book.get(entry.material)?.sell;
        mats_value += sell.to_decimal() * stack * entry.fraction * SELLER_SHARE;
    }
    let mats_value = Money::from_decimal_trunc(mats_value);

    let crafting_cost = stack_buy + salvage_costs;
    Ok(MoneyFields::new()
        .with("stack_buy", stack_buy)
        .with("salvage_costs", salvage_costs)
        .with("mats_value_after_tax", mats_value)
        .with(CRAFTING_COST, crafting_cost)
        .with(SELL, mats_value)
        .with(PROFIT, mats_value - crafting_cost))
}

fn evaluate_flip(table: &FlipTable, book: &PriceBook) -> Result<MoneyFields, PriceError> {
    let mut fields = MoneyFields::new();
    for (label, id) in &table.items {
        let record = book.get(*id)?;
        fields.push(format!("{}_buy", label), record.buy);
        fields.push(format!("{}_sell", label), record.sell);
        fields.push(format!("{}_flip", label), record.flip_profit());
    }
    Ok(fields)
}
