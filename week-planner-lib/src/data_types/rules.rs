use indexmap::IndexMap;
use serde::Deserialize;

use super::recipe::{MealType, ProteinType};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeekShape {
    pub days: Vec<String>,
    pub meals: Vec<MealType>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MealRule {
    pub allow_carbs: bool,
}

/// Protein grams per meal type. A missing entry means the protein is
/// not served at that meal; the cross-validator checks coverage for
/// every recipe that needs it.
#[derive(Debug, Copy, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MealPortions {
    #[serde(default)]
    pub lunch: Option<f64>,
    #[serde(default)]
    pub dinner: Option<f64>,
}

impl MealPortions {
    #[must_use]
    pub fn for_meal(&self, meal: MealType) -> Option<f64> {
        match meal {
            MealType::Lunch => self.lunch,
            MealType::Dinner => self.dinner,
        }
    }
}

/// Per-meal carb defaults. `overrides` is part of the schema but carb
/// quantities resolve from the ingredient's `default_qty_g`; see
/// DESIGN.md for the precedence decision.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CarbPortions {
    #[serde(default)]
    pub lunch: Option<f64>,
    #[serde(default)]
    pub dinner: Option<f64>,
    #[serde(default)]
    pub overrides: IndexMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanningConstraints {
    pub weekly_protein_counts: IndexMap<ProteinType, u32>,
    pub no_consecutive_same_protein: bool,
    pub fish_dinner_max_per_week: u32,
    pub fish_dinner_max_consecutive: u32,
    pub max_recipe_uses_per_week: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rules {
    pub week: WeekShape,
    pub meal_rules: IndexMap<MealType, MealRule>,
    pub protein_portions_g: IndexMap<ProteinType, MealPortions>,
    #[serde(default)]
    pub carb_portions_g: CarbPortions,
    pub constraints: PlanningConstraints,
}

impl Rules {
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.week.days.len() * self.week.meals.len()
    }

    #[must_use]
    pub fn protein_portion_g(&self, protein: ProteinType, meal: MealType) -> Option<f64> {
        self.protein_portions_g
            .get(&protein)
            .and_then(|portions| portions.for_meal(meal))
    }

    /// Meals without an explicit rule allow carbs.
    #[must_use]
    pub fn allows_carbs_at(&self, meal: MealType) -> bool {
        self.meal_rules
            .get(&meal)
            .is_none_or(|rule| rule.allow_carbs)
    }
}
