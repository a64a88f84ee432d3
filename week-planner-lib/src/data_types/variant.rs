use super::catalog::Catalog;
use super::recipe::{CarbStrategy, MealType, Recipe};

/// A concrete schedulable unit: a recipe with its carb choice
/// resolved. Variants are the atoms the solver assigns to slots.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeVariant {
    pub base_recipe_id: String,
    pub variant_id: String,
    pub recipe: Recipe,
    pub carb_ingredient_id: Option<String>,
}

impl RecipeVariant {
    fn new(recipe: &Recipe, carb_id: Option<&str>) -> Self {
        Self {
            base_recipe_id: recipe.id.clone(),
            variant_id: variant_id(&recipe.id, carb_id),
            recipe: recipe.clone(),
            carb_ingredient_id: carb_id.map(str::to_owned),
        }
    }

    #[must_use]
    pub fn has_carb(&self) -> bool {
        self.carb_ingredient_id.is_some()
    }

    #[must_use]
    pub fn allows_meal(&self, meal: MealType) -> bool {
        self.recipe.allows_meal(meal)
    }
}

/// Stable textual variant key exposed in outputs.
#[must_use]
pub fn variant_id(recipe_id: &str, carb_id: Option<&str>) -> String {
    match carb_id {
        Some(carb) => format!("{recipe_id}__carb_{carb}"),
        None => format!("{recipe_id}__carb_none"),
    }
}

/// Expand every catalog recipe into its variants, in catalog order.
///
/// OPTIONAL recipes get one variant per allowed carb plus a no-carb
/// variant, so they stay schedulable at meals where carbs are off.
#[must_use]
pub fn expand_variants(catalog: &Catalog) -> Vec<RecipeVariant> {
    let mut variants = Vec::new();
    for recipe in catalog.recipes().values() {
        match recipe.carbs.strategy {
            CarbStrategy::None => variants.push(RecipeVariant::new(recipe, None)),
            CarbStrategy::Fixed => {
                if let Some(carb_id) = recipe.carbs.default.as_deref() {
                    variants.push(RecipeVariant::new(recipe, Some(carb_id)));
                }
            }
            CarbStrategy::Optional => {
                for carb_id in &recipe.carbs.allowed {
                    variants.push(RecipeVariant::new(recipe, Some(carb_id)));
                }
                variants.push(RecipeVariant::new(recipe, None));
            }
        }
    }
    tracing::debug!(
        recipes = catalog.recipes().len(),
        variants = variants.len(),
        "expanded recipe variants"
    );
    variants
}
