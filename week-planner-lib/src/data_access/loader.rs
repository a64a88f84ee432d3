use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::de::DeserializeOwned;

use crate::data_types::{Catalog, Ingredient, Recipe, Rules};
use crate::error::PlannerError;

/// Load and cross-validate a data directory:
/// `ingredients.yml`, `recipes/*.yml`, `rules.yml`, `pantry.yml`.
pub fn load_catalog(data_dir: &Path) -> Result<Catalog, PlannerError> {
    let ingredients: IndexMap<String, Ingredient> =
        read_yaml(&data_dir.join("ingredients.yml"))?;
    let rules: Rules = read_yaml(&data_dir.join("rules.yml"))?;
    let pantry: Vec<String> =
        read_yaml::<Option<Vec<String>>>(&data_dir.join("pantry.yml"))?.unwrap_or_default();
    let recipes = load_recipes(data_dir)?;

    tracing::debug!(
        ingredients = ingredients.len(),
        recipes = recipes.len(),
        pantry = pantry.len(),
        "loaded data directory {}",
        data_dir.display()
    );

    Catalog::new(ingredients, recipes, rules, pantry)
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, PlannerError> {
    let text = fs::read_to_string(path).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            PlannerError::MissingFile(path.display().to_string())
        } else {
            PlannerError::MissingFile(format!("{}: {err}", path.display()))
        }
    })?;
    serde_yaml::from_str(&text)
        .map_err(|err| PlannerError::Schema(format!("{}: {err}", path.display())))
}

/// Recipe files are read in sorted filename order so the catalog, and
/// everything derived from it, does not depend on directory order.
fn load_recipes(data_dir: &Path) -> Result<IndexMap<String, Recipe>, PlannerError> {
    let recipes_dir = data_dir.join("recipes");
    let entries = fs::read_dir(&recipes_dir)
        .map_err(|_| PlannerError::MissingFile(recipes_dir.display().to_string()))?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "yml"))
        .collect();
    paths.sort();

    let mut recipes = IndexMap::new();
    for path in paths {
        let recipe: Recipe = read_yaml(&path)?;
        if recipes.contains_key(&recipe.id) {
            return Err(PlannerError::Referential(format!(
                "duplicate recipe id {} (from {})",
                recipe.id,
                path.display()
            )));
        }
        recipes.insert(recipe.id.clone(), recipe);
    }
    Ok(recipes)
}
