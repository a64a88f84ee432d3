use core::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{EnumCount, EnumIter};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, EnumIter, EnumCount, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Lunch,
    Dinner,
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let meal_str = match self {
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
        };
        write!(f, "{meal_str}")
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, EnumIter, EnumCount, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProteinType {
    Chicken,
    Beef,
    Pork,
    Fish,
    Egg,
}

impl fmt::Display for ProteinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let protein_str = match self {
            ProteinType::Chicken => "chicken",
            ProteinType::Beef => "beef",
            ProteinType::Pork => "pork",
            ProteinType::Fish => "fish",
            ProteinType::Egg => "egg",
        };
        write!(f, "{protein_str}")
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarbStrategy {
    None,
    Fixed,
    Optional,
}

/// Carb policy of a recipe. Coherence between `strategy`, `default`
/// and `allowed` is enforced by the cross-validator, not here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CarbPolicy {
    pub strategy: CarbStrategy,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub allowed: Vec<String>,
}

/// Quantity of a recipe ingredient, one form per entry.
/// `Portion` is the `@portion` sentinel resolved against the rules'
/// protein portion table at materialization time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Quantity {
    Portion,
    Grams(f64),
    Millilitres(f64),
    Units(f64),
    Unspecified,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRecipeIngredient {
    item: String,
    #[serde(default)]
    qty: Option<String>,
    #[serde(default)]
    qty_g: Option<f64>,
    #[serde(default)]
    qty_ml: Option<f64>,
    #[serde(default)]
    qty_units: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawRecipeIngredient")]
pub struct RecipeIngredient {
    pub item: String,
    pub quantity: Quantity,
}

impl TryFrom<RawRecipeIngredient> for RecipeIngredient {
    type Error = String;

    fn try_from(raw: RawRecipeIngredient) -> Result<Self, Self::Error> {
        let mut forms = Vec::new();
        if let Some(qty) = raw.qty {
            if qty != "@portion" {
                return Err(format!(
                    "ingredient {}: unknown qty sentinel {qty:?} (only \"@portion\" is accepted)",
                    raw.item
                ));
            }
            forms.push(Quantity::Portion);
        }
        if let Some(grams) = raw.qty_g {
            forms.push(Quantity::Grams(grams));
        }
        if let Some(millilitres) = raw.qty_ml {
            forms.push(Quantity::Millilitres(millilitres));
        }
        if let Some(units) = raw.qty_units {
            forms.push(Quantity::Units(units));
        }
        if forms.len() > 1 {
            return Err(format!(
                "ingredient {}: more than one quantity form given",
                raw.item
            ));
        }
        Ok(Self {
            item: raw.item,
            quantity: forms.pop().unwrap_or(Quantity::Unspecified),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeTags {
    pub primary_protein: ProteinType,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub meal_types: Vec<MealType>,
    pub tags: RecipeTags,
    pub carbs: CarbPolicy,
    pub ingredients: Vec<RecipeIngredient>,
}

impl Recipe {
    #[must_use]
    pub fn primary_protein(&self) -> ProteinType {
        self.tags.primary_protein
    }

    #[must_use]
    pub fn allows_meal(&self, meal: MealType) -> bool {
        self.meal_types.contains(&meal)
    }
}
