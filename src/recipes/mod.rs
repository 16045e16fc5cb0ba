//! Declarative recipe definitions.
//!
//! A recipe is pure configuration: which items to price, on which side of
//! the book, in what quantities. The evaluator in [`crate::engine`] turns a
//! recipe plus a price book into display figures.

pub mod catalog;
pub mod items;

pub use catalog::Catalog;

use crate::domain::{ItemId, Money, PriceSide};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeSet;

/// One input of a crafting path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub item: ItemId,
    pub quantity: u32,
    pub side: PriceSide,
}

impl Ingredient {
    /// Ingredient bought through a buy order.
    pub fn buy(item: ItemId, quantity: u32) -> Self {
        Self {
            item,
            quantity,
            side: PriceSide::Buy,
        }
    }

    /// Ingredient bought instantly from the cheapest listing.
    pub fn sell(item: ItemId, quantity: u32) -> Self {
        Self {
            item,
            quantity,
            side: PriceSide::Sell,
        }
    }
}

/// One way to source the inputs of a crafting recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientPath {
    pub label: &'static str,
    pub ingredients: Vec<Ingredient>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftingRecipe {
    /// Alternative ingredient paths; the cheapest one wins, ties go to the
    /// first declared path.
    pub paths: Vec<IngredientPath>,
    pub output: ItemId,
    pub output_quantity: u32,
    /// Applied after tax, e.g. the expected ectoplasm per identified item.
    pub yield_multiplier: Decimal,
}

/// Expected share of a salvage stack that comes out as one material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YieldEntry {
    pub material: ItemId,
    pub fraction: Decimal,
}

/// Flat per-use charge of a salvage kit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalvageFee {
    pub label: &'static str,
    pub per_use: Money,
    pub uses: i64,
}

impl SalvageFee {
    pub fn total(&self) -> Money {
        self.per_use * self.uses
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalvageRecipe {
    pub stack_item: ItemId,
    pub stack_size: u32,
    pub yields: Vec<YieldEntry>,
    pub fees: Vec<SalvageFee>,
}

/// A named set of items quoted with buy, sell, and flip figures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlipTable {
    pub items: Vec<(&'static str, ItemId)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeKind {
    Crafting(CraftingRecipe),
    Salvage(SalvageRecipe),
    Flip(FlipTable),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KindTag {
    Crafting,
    Salvage,
    Flip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// URL segment and history table name.
    pub slug: &'static str,
    pub title: &'static str,
    pub kind: RecipeKind,
}

impl Recipe {
    /// Every item the recipe needs priced, deduplicated.
    pub fn item_ids(&self) -> Vec<ItemId> {
        let mut ids = BTreeSet::new();
        match &self.kind {
            RecipeKind::Crafting(c) => {
                ids.insert(c.output);
                for path in &c.paths {
                    ids.extend(path.ingredients.iter().map(|i| i.item));
                }
            }
            RecipeKind::Salvage(s) => {
                ids.insert(s.stack_item);
                ids.extend(s.yields.iter().map(|y| y.material));
            }
            RecipeKind::Flip(f) => {
                ids.extend(f.items.iter().map(|(_, id)| *id));
            }
        }
        ids.into_iter().collect()
    }

    pub fn kind_tag(&self) -> KindTag {
        match self.kind {
            RecipeKind::Crafting(_) => KindTag::Crafting,
            RecipeKind::Salvage(_) => KindTag::Salvage,
            RecipeKind::Flip(_) => KindTag::Flip,
        }
    }

    /// Whether evaluation produces `crafting_cost` and `sell`, i.e. whether
    /// the recipe can be snapshotted into history.
    pub fn is_trackable(&self) -> bool {
        !matches!(self.kind, RecipeKind::Flip(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_item_ids_dedup_across_paths() {
        let recipe = Recipe {
            slug: "r",
            title: "R",
            kind: RecipeKind::Crafting(CraftingRecipe {
                paths: vec![
                    IngredientPath {
                        label: "a",
                        ingredients: vec![
                            Ingredient::buy(ItemId::new(1), 1),
                            Ingredient::buy(ItemId::new(2), 1),
                        ],
                    },
                    IngredientPath {
                        label: "b",
                        ingredients: vec![
                            Ingredient::buy(ItemId::new(1), 1),
                            Ingredient::buy(ItemId::new(3), 1),
                        ],
                    },
                ],
                output: ItemId::new(9),
                output_quantity: 1,
                yield_multiplier: dec!(1),
            }),
        };
        assert_eq!(
            recipe.item_ids(),
            vec![ItemId::new(1), ItemId::new(2), ItemId::new(3), ItemId::new(9)]
        );
        assert!(recipe.is_trackable());
    }

    #[test]
    fn test_salvage_fee_total() {
        let fee = SalvageFee {
            label: "runecrafter",
            per_use: Money::from_copper(30),
            uses: 245,
        };
        assert_eq!(fee.total().copper(), 7_350);
    }
}
