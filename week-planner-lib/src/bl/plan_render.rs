use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde::Serialize;
use strum::IntoEnumIterator;

use super::constraints_solver::Assignment;
use crate::data_types::{Catalog, MealType, ProteinType, Quantity, RecipeVariant, Rules};

/// One resolved ingredient line of a plan slot. `role` is only set on
/// the synthetic carb entry appended for carb-bearing variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanIngredient {
    pub item: String,
    pub display: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanSlot {
    pub day: String,
    pub meal: String,
    pub recipe_id: String,
    pub recipe_name: String,
    pub variant_id: String,
    pub protein: String,
    pub carb: String,
    pub protein_g: f64,
    pub carb_g: Option<f64>,
    pub ingredients: Vec<PlanIngredient>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanDerived {
    pub protein_counts: IndexMap<String, u32>,
    pub carb_counts: IndexMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanOutput {
    pub seed: u64,
    pub generated_at: String,
    pub slots: Vec<PlanSlot>,
    pub derived: PlanDerived,
}

/// Resolve one recipe-ingredient quantity for a given meal.
/// `@portion` reads the protein portion table; absent forms are 0.
#[must_use]
pub fn resolve_quantity(
    quantity: Quantity,
    protein: ProteinType,
    meal: MealType,
    rules: &Rules,
) -> f64 {
    match quantity {
        Quantity::Portion => rules.protein_portion_g(protein, meal).unwrap_or(0.0),
        Quantity::Grams(value) | Quantity::Millilitres(value) | Quantity::Units(value) => value,
        Quantity::Unspecified => 0.0,
    }
}

/// Turn a raw assignment into the consumable plan: canonical-order
/// slot records with resolved ingredient lists, plus derived counts.
#[must_use]
pub fn materialize_plan(
    assignment: &Assignment,
    variants: &[RecipeVariant],
    catalog: &Catalog,
    seed: u64,
    generated_at: DateTime<Local>,
) -> PlanOutput {
    let rules = catalog.rules();

    let mut protein_counts: IndexMap<String, u32> =
        ProteinType::iter().map(|p| (p.to_string(), 0)).collect();
    let mut carb_counts: IndexMap<String, u32> = IndexMap::new();
    let mut slots = Vec::with_capacity(assignment.len());

    for (slot, variant) in assignment.iter(variants) {
        let protein = variant.recipe.primary_protein();
        if let Some(count) = protein_counts.get_mut(&protein.to_string()) {
            *count += 1;
        }
        if let Some(carb_id) = &variant.carb_ingredient_id {
            *carb_counts.entry(carb_id.clone()).or_insert(0) += 1;
        }

        let mut ingredients: Vec<PlanIngredient> = variant
            .recipe
            .ingredients
            .iter()
            .map(|entry| {
                let info = catalog.ingredients().get(&entry.item);
                PlanIngredient {
                    item: entry.item.clone(),
                    display: info.map_or_else(|| entry.item.clone(), |ing| ing.display.clone()),
                    quantity: resolve_quantity(entry.quantity, protein, slot.meal, rules),
                    unit: info.map_or_else(String::new, |ing| ing.unit.clone()),
                    role: None,
                }
            })
            .collect();

        let carb_g = variant.carb_ingredient_id.as_deref().map(|carb_id| {
            let grams = catalog.carb_default_g(carb_id);
            let info = catalog.ingredients().get(carb_id);
            ingredients.push(PlanIngredient {
                item: carb_id.to_string(),
                display: info.map_or_else(|| carb_id.to_string(), |ing| ing.display.clone()),
                quantity: grams,
                unit: info.map_or_else(String::new, |ing| ing.unit.clone()),
                role: Some("carb".to_string()),
            });
            grams
        });

        slots.push(PlanSlot {
            day: slot.day_label.clone(),
            meal: slot.meal.to_string(),
            recipe_id: variant.base_recipe_id.clone(),
            recipe_name: variant.recipe.name.clone(),
            variant_id: variant.variant_id.clone(),
            protein: protein.to_string(),
            carb: variant
                .carb_ingredient_id
                .clone()
                .unwrap_or_else(|| "none".to_string()),
            protein_g: resolve_quantity(Quantity::Portion, protein, slot.meal, rules),
            carb_g,
            ingredients,
        });
    }

    PlanOutput {
        seed,
        generated_at: generated_at.to_rfc3339(),
        slots,
        derived: PlanDerived {
            protein_counts,
            carb_counts,
        },
    }
}
