//! Shared builders for the unit tests in this crate.

use indexmap::IndexMap;

use super::catalog::Catalog;
use super::ingredient::{Ingredient, IngredientKind};
use super::recipe::{
    CarbPolicy, MealType, ProteinType, Quantity, Recipe, RecipeIngredient, RecipeTags,
};
use super::rules::{MealPortions, MealRule, PlanningConstraints, Rules, WeekShape};
use crate::error::PlannerError;
use strum::IntoEnumIterator;

pub(crate) fn protein_ingredient(display: &str) -> Ingredient {
    Ingredient {
        display: display.to_string(),
        unit: "g".to_string(),
        section: "butcher".to_string(),
        kind: IngredientKind::Protein,
        default_qty_g: None,
        max_times_week: None,
    }
}

pub(crate) fn carb(display: &str, default_qty_g: f64, max_times_week: Option<u32>) -> Ingredient {
    Ingredient {
        display: display.to_string(),
        unit: "g".to_string(),
        section: "dry goods".to_string(),
        kind: IngredientKind::Carb,
        default_qty_g: Some(default_qty_g),
        max_times_week,
    }
}

pub(crate) fn other_ingredient(display: &str, section: &str) -> Ingredient {
    Ingredient {
        display: display.to_string(),
        unit: "g".to_string(),
        section: section.to_string(),
        kind: IngredientKind::Other,
        default_qty_g: None,
        max_times_week: None,
    }
}

pub(crate) fn portion_entry(item: &str) -> RecipeIngredient {
    RecipeIngredient {
        item: item.to_string(),
        quantity: Quantity::Portion,
    }
}

pub(crate) fn grams_entry(item: &str, grams: f64) -> RecipeIngredient {
    RecipeIngredient {
        item: item.to_string(),
        quantity: Quantity::Grams(grams),
    }
}

/// Conventional catalog key for each protein's portion ingredient.
pub(crate) fn protein_item(protein: ProteinType) -> &'static str {
    match protein {
        ProteinType::Chicken => "chicken_breast",
        ProteinType::Beef => "beef_steak",
        ProteinType::Pork => "pork_loin",
        ProteinType::Fish => "white_fish",
        ProteinType::Egg => "eggs",
    }
}

/// A lunch+dinner recipe whose only ingredient is the `@portion`
/// protein entry for its primary protein.
pub(crate) fn recipe_with_carbs(id: &str, protein: ProteinType, carbs: CarbPolicy) -> Recipe {
    Recipe {
        id: id.to_string(),
        name: id.replace('_', " "),
        meal_types: vec![MealType::Lunch, MealType::Dinner],
        tags: RecipeTags {
            primary_protein: protein,
        },
        carbs,
        ingredients: vec![portion_entry(protein_item(protein))],
    }
}

/// Rules for a lunch+dinner week over `days`, portions declared for
/// every protein, and `chicken_count` chicken slots covering the whole
/// week (set it to `days.len() * 2` for a valid catalog, or adjust the
/// returned rules through `CatalogBuilder::map_rules`).
pub(crate) fn fixture_rules(days: &[&str], chicken_count: u32) -> Rules {
    let mut meal_rules = IndexMap::new();
    meal_rules.insert(MealType::Lunch, MealRule { allow_carbs: true });
    meal_rules.insert(MealType::Dinner, MealRule { allow_carbs: true });

    let mut protein_portions_g = IndexMap::new();
    for protein in ProteinType::iter() {
        protein_portions_g.insert(
            protein,
            MealPortions {
                lunch: Some(150.0),
                dinner: Some(120.0),
            },
        );
    }

    let mut weekly_protein_counts = IndexMap::new();
    weekly_protein_counts.insert(ProteinType::Chicken, chicken_count);

    Rules {
        week: WeekShape {
            days: days.iter().map(|day| (*day).to_string()).collect(),
            meals: vec![MealType::Lunch, MealType::Dinner],
        },
        meal_rules,
        protein_portions_g,
        carb_portions_g: super::rules::CarbPortions::default(),
        constraints: PlanningConstraints {
            weekly_protein_counts,
            no_consecutive_same_protein: false,
            fish_dinner_max_per_week: 7,
            fish_dinner_max_consecutive: 3,
            max_recipe_uses_per_week: 7,
        },
    }
}

pub(crate) struct CatalogBuilder {
    ingredients: IndexMap<String, Ingredient>,
    recipes: IndexMap<String, Recipe>,
    rules: Rules,
    pantry: Vec<String>,
}

impl CatalogBuilder {
    pub(crate) fn new(rules: Rules) -> Self {
        Self {
            ingredients: IndexMap::new(),
            recipes: IndexMap::new(),
            rules,
            pantry: Vec::new(),
        }
    }

    pub(crate) fn ingredient(mut self, id: &str, ingredient: Ingredient) -> Self {
        self.ingredients.insert(id.to_string(), ingredient);
        self
    }

    pub(crate) fn recipe(mut self, recipe: Recipe) -> Self {
        self.recipes.insert(recipe.id.clone(), recipe);
        self
    }

    pub(crate) fn pantry_item(mut self, id: &str) -> Self {
        self.pantry.push(id.to_string());
        self
    }

    pub(crate) fn map_rules(mut self, f: impl FnOnce(&mut Rules)) -> Self {
        f(&mut self.rules);
        self
    }

    pub(crate) fn build(self) -> Result<Catalog, PlannerError> {
        Catalog::new(self.ingredients, self.recipes, self.rules, self.pantry)
    }
}
