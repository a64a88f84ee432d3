use indexmap::IndexMap;
use serde::Serialize;

use super::constraints_solver::Assignment;
use super::plan_render::resolve_quantity;
use crate::data_types::{Catalog, RecipeVariant};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingItem {
    pub item: String,
    pub display: String,
    pub quantity: f64,
    pub unit: String,
    pub section: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Shopping list grouped by store section. Section order and item
/// order within a section follow the first touch of the canonical
/// slot traversal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingList {
    pub sections: IndexMap<String, Vec<ShoppingItem>>,
}

impl ShoppingList {
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn find(&self, ingredient_id: &str) -> Option<&ShoppingItem> {
        self.sections
            .values()
            .flatten()
            .find(|entry| entry.item == ingredient_id)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fold the week's assignment into per-ingredient totals, drop what
/// the pantry already covers, and group the rest by section.
#[must_use]
pub fn generate_shopping_list(
    assignment: &Assignment,
    variants: &[RecipeVariant],
    catalog: &Catalog,
) -> ShoppingList {
    let mut totals: IndexMap<String, f64> = IndexMap::new();

    for (slot, variant) in assignment.iter(variants) {
        let protein = variant.recipe.primary_protein();
        for entry in &variant.recipe.ingredients {
            let quantity = resolve_quantity(entry.quantity, protein, slot.meal, catalog.rules());
            if quantity > 0.0 {
                *totals.entry(entry.item.clone()).or_insert(0.0) += quantity;
            }
        }
        if let Some(carb_id) = &variant.carb_ingredient_id {
            let quantity = catalog.carb_default_g(carb_id);
            if quantity > 0.0 {
                *totals.entry(carb_id.clone()).or_insert(0.0) += quantity;
            }
        }
    }

    totals.retain(|item, _| !catalog.is_pantry(item));

    let mut sections: IndexMap<String, Vec<ShoppingItem>> = IndexMap::new();
    for (item_id, &quantity) in &totals {
        let Some(info) = catalog.ingredients().get(item_id) else {
            continue;
        };
        sections
            .entry(info.section.clone())
            .or_default()
            .push(ShoppingItem {
                item: item_id.clone(),
                display: info.display.clone(),
                quantity: round2(quantity),
                unit: info.unit.clone(),
                section: info.section.clone(),
                notes: None,
            });
    }

    tracing::debug!(
        items = sections.values().map(Vec::len).sum::<usize>(),
        sections = sections.len(),
        "aggregated shopping list"
    );
    ShoppingList { sections }
}
