//! Built-in recipe catalog.
//!
//! Quantities and yield fractions are hand-tuned constants. Salvage yield
//! fractions are empirical drop rates per 250-item stack.

use super::items::*;
use super::{
    CraftingRecipe, FlipTable, Ingredient, IngredientPath, Recipe, RecipeKind, SalvageFee,
    SalvageRecipe, YieldEntry,
};
use crate::domain::Money;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const STACK_SIZE: u32 = 250;

/// Immutable set of recipes, looked up by slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    recipes: Vec<Recipe>,
}

impl Catalog {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    pub fn builtin() -> Self {
        Self::new(vec![
            scholar_rune(),
            relic_of_fireworks(),
            gear_to_ecto(),
            gear_salvage(),
            t5_mats(),
        ])
    }

    pub fn get(&self, slug: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.slug == slug)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter()
    }

    /// Recipes with a history table.
    pub fn trackable(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter().filter(|r| r.is_trackable())
    }

    pub fn is_trackable(&self, slug: &str) -> bool {
        self.get(slug).map(Recipe::is_trackable).unwrap_or(false)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn lucent_paths(
    labels: (&'static str, &'static str),
    shared: Vec<Ingredient>,
    crystals: u32,
) -> Vec<IngredientPath> {
    let mut with_crystal = shared.clone();
    with_crystal.push(Ingredient::buy(PILE_OF_LUCENT_CRYSTAL, crystals));

    // 10 motes refine into one pile of crystal
    let mut with_motes = shared;
    with_motes.push(Ingredient::buy(LUCENT_MOTE, crystals * 10));

    vec![
        IngredientPath {
            label: labels.0,
            ingredients: with_crystal,
        },
        IngredientPath {
            label: labels.1,
            ingredients: with_motes,
        },
    ]
}

fn scholar_rune() -> Recipe {
    Recipe {
        slug: "scholar_rune",
        title: "Scholar Rune",
        kind: RecipeKind::Crafting(CraftingRecipe {
            paths: lucent_paths(
                ("crystal", "mote"),
                vec![
                    Ingredient::buy(ECTOPLASM, 5),
                    Ingredient::buy(ELABORATE_TOTEM, 5),
                    Ingredient::buy(CHARM_OF_BRILLIANCE, 2),
                ],
                8,
            ),
            output: SCHOLAR_RUNE,
            output_quantity: 1,
            yield_multiplier: Decimal::ONE,
        }),
    }
}

fn relic_of_fireworks() -> Recipe {
    Recipe {
        slug: "relic_of_fireworks",
        title: "Relic of Fireworks",
        kind: RecipeKind::Crafting(CraftingRecipe {
            paths: lucent_paths(
                ("crystal", "mote"),
                vec![
                    Ingredient::buy(ECTOPLASM, 15),
                    Ingredient::buy(CHARM_OF_SKILL, 3),
                ],
                48,
            ),
            output: RELIC_OF_FIREWORKS,
            output_quantity: 1,
            yield_multiplier: Decimal::ONE,
        }),
    }
}

fn gear_to_ecto() -> Recipe {
    Recipe {
        slug: "gear_to_ecto",
        title: "Rare Gear to Ecto",
        kind: RecipeKind::Crafting(CraftingRecipe {
            paths: vec![IngredientPath {
                label: "rare_gear",
                ingredients: vec![Ingredient::buy(RARE_UNID_GEAR, 1)],
            }],
            output: ECTOPLASM,
            output_quantity: 1,
            yield_multiplier: dec!(0.9),
        }),
    }
}

fn gear_salvage() -> Recipe {
    let yields = [
        (MITHRIL_ORE, dec!(0.4299)),
        (ELDER_WOOD_LOG, dec!(0.3564)),
        (SILK_SCRAP, dec!(0.3521)),
        (THICK_LEATHER, dec!(0.2673)),
        (ORICHALCUM, dec!(0.0387)),
        (ANCIENT_WOOD, dec!(0.0287)),
        (GOSSAMER_SCRAP, dec!(0.018)),
        (HARDENED_LEATHER, dec!(0.0169)),
        (ECTOPLASM, dec!(0.0296)),
        (LUCENT_MOTE, dec!(0.98)),
        (SYMBOL_OF_CONTROL, dec!(0.0018)),
        (SYMBOL_OF_ENHANCEMENT, dec!(0.001)),
        (SYMBOL_OF_PAIN, dec!(0.0006)),
        (CHARM_OF_BRILLIANCE, dec!(0.0042)),
        (CHARM_OF_POTENCE, dec!(0.0029)),
        (CHARM_OF_SKILL, dec!(0.0028)),
    ];

    Recipe {
        slug: "gear_salvage",
        title: "Gear Salvage",
        kind: RecipeKind::Salvage(SalvageRecipe {
            stack_item: UNID_GEAR,
            stack_size: STACK_SIZE,
            yields: yields
                .into_iter()
                .map(|(material, fraction)| YieldEntry { material, fraction })
                .collect(),
            fees: vec![
                SalvageFee {
                    label: "runecrafter",
                    per_use: Money::from_copper(30),
                    uses: 245,
                },
                SalvageFee {
                    label: "silver_fed",
                    per_use: Money::from_copper(60),
                    uses: 5,
                },
            ],
        }),
    }
}

fn t5_mats() -> Recipe {
    Recipe {
        slug: "t5_mats",
        title: "T5 Mats",
        kind: RecipeKind::Flip(FlipTable {
            items: vec![
                ("large_claw", LARGE_CLAW),
                ("potent_blood", POTENT_BLOOD),
                ("large_bone", LARGE_BONE),
                ("intricate_totem", INTRICATE_TOTEM),
                ("large_fang", LARGE_FANG),
                ("potent_venom", POTENT_VENOM_SAC),
                ("large_scale", LARGE_SCALE),
            ],
        }),
    }
}
