use indexmap::IndexMap;

use super::ingredient::{Ingredient, IngredientKind};
use super::recipe::{CarbStrategy, Quantity, Recipe};
use super::rules::Rules;
use crate::error::PlannerError;

/// Validated snapshot of the household data. The only way to obtain
/// one is through [`Catalog::new`], which runs the full cross-file
/// validation, so holding a `Catalog` means every reference resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    ingredients: IndexMap<String, Ingredient>,
    recipes: IndexMap<String, Recipe>,
    rules: Rules,
    pantry: Vec<String>,
}

impl Catalog {
    pub fn new(
        ingredients: IndexMap<String, Ingredient>,
        recipes: IndexMap<String, Recipe>,
        rules: Rules,
        pantry: Vec<String>,
    ) -> Result<Self, PlannerError> {
        validate_week(&rules)?;
        validate_ingredients(&ingredients)?;
        validate_pantry(&pantry, &ingredients)?;
        for recipe in recipes.values() {
            validate_recipe(recipe, &ingredients, &rules)?;
        }
        validate_protein_totals(&rules)?;
        Ok(Self {
            ingredients,
            recipes,
            rules,
            pantry,
        })
    }

    #[must_use]
    pub fn ingredients(&self) -> &IndexMap<String, Ingredient> {
        &self.ingredients
    }

    #[must_use]
    pub fn recipes(&self) -> &IndexMap<String, Recipe> {
        &self.recipes
    }

    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    #[must_use]
    pub fn pantry(&self) -> &[String] {
        &self.pantry
    }

    #[must_use]
    pub fn is_pantry(&self, ingredient_id: &str) -> bool {
        self.pantry.iter().any(|item| item == ingredient_id)
    }

    /// Grams of a carb when it lands on a plate or a shopping list.
    /// Resolution uses the catalog default only; `carb_portions_g`
    /// overrides are not consulted (see DESIGN.md).
    #[must_use]
    pub fn carb_default_g(&self, ingredient_id: &str) -> f64 {
        self.ingredients
            .get(ingredient_id)
            .and_then(|ing| ing.default_qty_g)
            .unwrap_or(0.0)
    }
}

fn validate_week(rules: &Rules) -> Result<(), PlannerError> {
    if rules.week.days.len() < 2 {
        return Err(PlannerError::Schema(format!(
            "week must declare at least 2 days, got {}",
            rules.week.days.len()
        )));
    }
    if rules.week.meals.is_empty() {
        return Err(PlannerError::Schema(
            "week must declare at least one meal".to_string(),
        ));
    }
    for (index, day) in rules.week.days.iter().enumerate() {
        if rules.week.days[..index].contains(day) {
            return Err(PlannerError::Schema(format!("duplicate week day: {day}")));
        }
    }
    for (index, meal) in rules.week.meals.iter().enumerate() {
        if rules.week.meals[..index].contains(meal) {
            return Err(PlannerError::Schema(format!("duplicate week meal: {meal}")));
        }
    }
    Ok(())
}

fn validate_ingredients(ingredients: &IndexMap<String, Ingredient>) -> Result<(), PlannerError> {
    for (ing_id, ing) in ingredients {
        if ing.kind != IngredientKind::Carb {
            if ing.default_qty_g.is_some() {
                return Err(PlannerError::Schema(format!(
                    "ingredient {ing_id}: default_qty_g is only valid on carb ingredients"
                )));
            }
            if ing.max_times_week.is_some() {
                return Err(PlannerError::Schema(format!(
                    "ingredient {ing_id}: max_times_week is only valid on carb ingredients"
                )));
            }
        }
    }
    Ok(())
}

fn validate_pantry(
    pantry: &[String],
    ingredients: &IndexMap<String, Ingredient>,
) -> Result<(), PlannerError> {
    for item in pantry {
        if !ingredients.contains_key(item) {
            return Err(PlannerError::Referential(format!(
                "pantry references unknown ingredient: {item}"
            )));
        }
    }
    Ok(())
}

fn validate_recipe(
    recipe: &Recipe,
    ingredients: &IndexMap<String, Ingredient>,
    rules: &Rules,
) -> Result<(), PlannerError> {
    if recipe.meal_types.is_empty() {
        return Err(PlannerError::Schema(format!(
            "recipe {}: meal_types must not be empty",
            recipe.id
        )));
    }

    let mut portion_entries = 0usize;
    for entry in &recipe.ingredients {
        let Some(ing) = ingredients.get(&entry.item) else {
            return Err(PlannerError::Referential(format!(
                "recipe {} references unknown ingredient: {}",
                recipe.id, entry.item
            )));
        };
        if entry.quantity == Quantity::Portion {
            portion_entries += 1;
            if ing.kind != IngredientKind::Protein {
                return Err(PlannerError::Referential(format!(
                    "recipe {}: @portion can only be used on protein ingredients, but {} is {}",
                    recipe.id, entry.item, ing.kind
                )));
            }
        }
    }
    if portion_entries != 1 {
        return Err(PlannerError::Schema(format!(
            "recipe {}: exactly one ingredient must use @portion, found {portion_entries}",
            recipe.id
        )));
    }

    validate_carb_policy(recipe, ingredients)?;

    let protein = recipe.primary_protein();
    let Some(portions) = rules.protein_portions_g.get(&protein) else {
        return Err(PlannerError::RulesCoverage(format!(
            "recipe {}: protein type {protein} has no portion entry in rules",
            recipe.id
        )));
    };
    for &meal in &recipe.meal_types {
        if portions.for_meal(meal).is_none() {
            return Err(PlannerError::RulesCoverage(format!(
                "recipe {}: no portion defined for {protein} at {meal}",
                recipe.id
            )));
        }
    }
    Ok(())
}

fn validate_carb_policy(
    recipe: &Recipe,
    ingredients: &IndexMap<String, Ingredient>,
) -> Result<(), PlannerError> {
    let policy = &recipe.carbs;
    let check_is_carb = |carb_id: &str, role: &str| -> Result<(), PlannerError> {
        let Some(ing) = ingredients.get(carb_id) else {
            return Err(PlannerError::Referential(format!(
                "recipe {}: {role} carb {carb_id} not found",
                recipe.id
            )));
        };
        if !ing.is_carb() {
            return Err(PlannerError::CarbPolicy(format!(
                "recipe {}: {role} {carb_id} is not a carb",
                recipe.id
            )));
        }
        Ok(())
    };

    match policy.strategy {
        CarbStrategy::None => {
            if policy.default.is_some() || !policy.allowed.is_empty() {
                return Err(PlannerError::CarbPolicy(format!(
                    "recipe {}: strategy 'none' cannot have allowed or default carbs",
                    recipe.id
                )));
            }
        }
        CarbStrategy::Fixed => {
            if !policy.allowed.is_empty() {
                return Err(PlannerError::CarbPolicy(format!(
                    "recipe {}: strategy 'fixed' cannot have an allowed list",
                    recipe.id
                )));
            }
            let Some(default) = policy.default.as_deref() else {
                return Err(PlannerError::CarbPolicy(format!(
                    "recipe {}: strategy 'fixed' requires a default carb",
                    recipe.id
                )));
            };
            check_is_carb(default, "default")?;
        }
        CarbStrategy::Optional => {
            if policy.allowed.is_empty() {
                return Err(PlannerError::CarbPolicy(format!(
                    "recipe {}: strategy 'optional' requires an allowed carbs list",
                    recipe.id
                )));
            }
            for (index, carb_id) in policy.allowed.iter().enumerate() {
                if policy.allowed[..index].contains(carb_id) {
                    return Err(PlannerError::CarbPolicy(format!(
                        "recipe {}: allowed carb {carb_id} listed more than once",
                        recipe.id
                    )));
                }
                check_is_carb(carb_id, "allowed")?;
            }
            let Some(default) = policy.default.as_deref() else {
                return Err(PlannerError::CarbPolicy(format!(
                    "recipe {}: strategy 'optional' requires a default carb",
                    recipe.id
                )));
            };
            check_is_carb(default, "default")?;
            if !policy.allowed.iter().any(|carb| carb == default) {
                return Err(PlannerError::CarbPolicy(format!(
                    "recipe {}: default carb must be in the allowed list",
                    recipe.id
                )));
            }
        }
    }
    Ok(())
}

fn validate_protein_totals(rules: &Rules) -> Result<(), PlannerError> {
    let total_meals = rules.slot_count();
    let protein_sum: usize = rules
        .constraints
        .weekly_protein_counts
        .values()
        .map(|&count| count as usize)
        .sum();
    if protein_sum != total_meals {
        return Err(PlannerError::RulesCoverage(format!(
            "protein counts sum to {protein_sum} but should equal {total_meals} ({} days x {} meals)",
            rules.week.days.len(),
            rules.week.meals.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::test_fixtures::{
        carb, fixture_rules, grams_entry, other_ingredient, portion_entry, protein_ingredient,
        recipe_with_carbs, CatalogBuilder,
    };
    use crate::data_types::{CarbPolicy, ProteinType};

    fn builder() -> CatalogBuilder {
        CatalogBuilder::new(fixture_rules(&["mon", "tue"], 4))
            .ingredient("chicken_breast", protein_ingredient("Chicken breast"))
            .ingredient("rice", carb("Rice", 80.0, None))
            .ingredient("salt", other_ingredient("Salt", "spices"))
    }

    fn no_carb_policy() -> CarbPolicy {
        CarbPolicy {
            strategy: CarbStrategy::None,
            default: None,
            allowed: Vec::new(),
        }
    }

    #[test]
    fn test_valid_catalog_builds() {
        let catalog = builder()
            .recipe(recipe_with_carbs(
                "roast",
                ProteinType::Chicken,
                no_carb_policy(),
            ))
            .build()
            .expect("catalog should validate");
        assert_eq!(catalog.recipes().len(), 1);
        assert!(!catalog.is_pantry("rice"));
    }

    #[test]
    fn test_pantry_unknown_ingredient_rejected() {
        let err = builder()
            .recipe(recipe_with_carbs(
                "roast",
                ProteinType::Chicken,
                no_carb_policy(),
            ))
            .pantry_item("dragonfruit")
            .build()
            .unwrap_err();
        assert!(matches!(err, PlannerError::Referential(_)), "{err}");
        assert!(err.to_string().contains("dragonfruit"));
    }

    #[test]
    fn test_recipe_unknown_ingredient_rejected() {
        let mut recipe = recipe_with_carbs("roast", ProteinType::Chicken, no_carb_policy());
        recipe.ingredients.push(grams_entry("saffron", 1.0));
        let err = builder().recipe(recipe).build().unwrap_err();
        assert!(matches!(err, PlannerError::Referential(_)), "{err}");
        assert!(err.to_string().contains("saffron"));
    }

    #[test]
    fn test_portion_on_non_protein_rejected() {
        let mut recipe = recipe_with_carbs("roast", ProteinType::Chicken, no_carb_policy());
        recipe.ingredients = vec![portion_entry("salt")];
        let err = builder().recipe(recipe).build().unwrap_err();
        assert!(matches!(err, PlannerError::Referential(_)), "{err}");
        assert!(err.to_string().contains("@portion"));
    }

    #[test]
    fn test_recipe_without_portion_entry_rejected() {
        let mut recipe = recipe_with_carbs("roast", ProteinType::Chicken, no_carb_policy());
        recipe.ingredients = vec![grams_entry("rice", 50.0)];
        let err = builder().recipe(recipe).build().unwrap_err();
        assert!(matches!(err, PlannerError::Schema(_)), "{err}");
        assert!(err.to_string().contains("exactly one"));
    }

    #[test]
    fn test_two_portion_entries_rejected() {
        let mut recipe = recipe_with_carbs("roast", ProteinType::Chicken, no_carb_policy());
        recipe.ingredients.push(portion_entry("chicken_breast"));
        let err = builder().recipe(recipe).build().unwrap_err();
        assert!(matches!(err, PlannerError::Schema(_)), "{err}");
    }

    #[test]
    fn test_fixed_strategy_requires_default() {
        let recipe = recipe_with_carbs(
            "roast",
            ProteinType::Chicken,
            CarbPolicy {
                strategy: CarbStrategy::Fixed,
                default: None,
                allowed: Vec::new(),
            },
        );
        let err = builder().recipe(recipe).build().unwrap_err();
        assert!(matches!(err, PlannerError::CarbPolicy(_)), "{err}");
    }

    #[test]
    fn test_fixed_default_must_be_carb() {
        let recipe = recipe_with_carbs(
            "roast",
            ProteinType::Chicken,
            CarbPolicy {
                strategy: CarbStrategy::Fixed,
                default: Some("salt".to_string()),
                allowed: Vec::new(),
            },
        );
        let err = builder().recipe(recipe).build().unwrap_err();
        assert!(matches!(err, PlannerError::CarbPolicy(_)), "{err}");
        assert!(err.to_string().contains("not a carb"));
    }

    #[test]
    fn test_fixed_unknown_default_is_referential() {
        let recipe = recipe_with_carbs(
            "roast",
            ProteinType::Chicken,
            CarbPolicy {
                strategy: CarbStrategy::Fixed,
                default: Some("quinoa".to_string()),
                allowed: Vec::new(),
            },
        );
        let err = builder().recipe(recipe).build().unwrap_err();
        assert!(matches!(err, PlannerError::Referential(_)), "{err}");
    }

    #[test]
    fn test_none_strategy_rejects_default() {
        let recipe = recipe_with_carbs(
            "roast",
            ProteinType::Chicken,
            CarbPolicy {
                strategy: CarbStrategy::None,
                default: Some("rice".to_string()),
                allowed: Vec::new(),
            },
        );
        let err = builder().recipe(recipe).build().unwrap_err();
        assert!(matches!(err, PlannerError::CarbPolicy(_)), "{err}");
    }

    #[test]
    fn test_optional_default_must_be_in_allowed() {
        let recipe = recipe_with_carbs(
            "roast",
            ProteinType::Chicken,
            CarbPolicy {
                strategy: CarbStrategy::Optional,
                default: Some("rice".to_string()),
                allowed: vec!["pasta".to_string()],
            },
        );
        let err = builder()
            .ingredient("pasta", carb("Pasta", 75.0, None))
            .recipe(recipe)
            .build()
            .unwrap_err();
        assert!(matches!(err, PlannerError::CarbPolicy(_)), "{err}");
        assert!(err.to_string().contains("allowed list"));
    }

    #[test]
    fn test_optional_duplicate_allowed_rejected() {
        let recipe = recipe_with_carbs(
            "roast",
            ProteinType::Chicken,
            CarbPolicy {
                strategy: CarbStrategy::Optional,
                default: Some("rice".to_string()),
                allowed: vec!["rice".to_string(), "rice".to_string()],
            },
        );
        let err = builder().recipe(recipe).build().unwrap_err();
        assert!(matches!(err, PlannerError::CarbPolicy(_)), "{err}");
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_missing_portion_coverage_rejected() {
        let recipe = recipe_with_carbs("roast", ProteinType::Beef, no_carb_policy());
        let mut builder = builder().ingredient("beef_steak", protein_ingredient("Beef steak"));
        builder = builder.map_rules(|rules| {
            let portions = rules
                .protein_portions_g
                .get_mut(&ProteinType::Beef)
                .expect("fixture declares beef portions");
            portions.dinner = None;
        });
        let err = builder.recipe(recipe).build().unwrap_err();
        assert!(matches!(err, PlannerError::RulesCoverage(_)), "{err}");
        assert!(err.to_string().contains("beef at dinner"));
    }

    #[test]
    fn test_protein_counts_must_cover_all_slots() {
        let err = builder()
            .recipe(recipe_with_carbs(
                "roast",
                ProteinType::Chicken,
                no_carb_policy(),
            ))
            .map_rules(|rules| {
                rules
                    .constraints
                    .weekly_protein_counts
                    .insert(ProteinType::Chicken, 5);
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, PlannerError::RulesCoverage(_)), "{err}");
        assert!(err.to_string().contains("sum to 5"));
    }

    #[test]
    fn test_short_week_rejected() {
        let err = CatalogBuilder::new(fixture_rules(&["mon"], 2))
            .build()
            .unwrap_err();
        assert!(matches!(err, PlannerError::Schema(_)), "{err}");
        assert!(err.to_string().contains("at least 2 days"));
    }

    #[test]
    fn test_carb_fields_on_non_carb_rejected() {
        let mut bad_salt = other_ingredient("Salt", "spices");
        bad_salt.default_qty_g = Some(5.0);
        let err = CatalogBuilder::new(fixture_rules(&["mon", "tue"], 4))
            .ingredient("salt", bad_salt)
            .build()
            .unwrap_err();
        assert!(matches!(err, PlannerError::Schema(_)), "{err}");
        assert!(err.to_string().contains("default_qty_g"));
    }

    #[test]
    fn test_carb_default_g_falls_back_to_zero() {
        let catalog = builder()
            .ingredient("couscous", carb("Couscous", 0.0, None))
            .recipe(recipe_with_carbs(
                "roast",
                ProteinType::Chicken,
                no_carb_policy(),
            ))
            .build()
            .unwrap();
        assert!((catalog.carb_default_g("rice") - 80.0).abs() < f64::EPSILON);
        assert!((catalog.carb_default_g("unknown")).abs() < f64::EPSILON);
    }
}
