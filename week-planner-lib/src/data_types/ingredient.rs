use core::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{EnumCount, EnumIter};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, EnumIter, EnumCount, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientKind {
    Protein,
    Carb,
    Other,
}

impl fmt::Display for IngredientKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind_str = match self {
            IngredientKind::Protein => "protein",
            IngredientKind::Carb => "carb",
            IngredientKind::Other => "other",
        };
        write!(f, "{kind_str}")
    }
}

/// A catalog ingredient. `default_qty_g` and `max_times_week` only
/// carry meaning for CARB ingredients; the cross-validator rejects
/// them anywhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ingredient {
    pub display: String,
    pub unit: String,
    pub section: String,
    pub kind: IngredientKind,
    #[serde(default)]
    pub default_qty_g: Option<f64>,
    #[serde(default)]
    pub max_times_week: Option<u32>,
}

impl Ingredient {
    #[must_use]
    pub fn is_carb(&self) -> bool {
        self.kind == IngredientKind::Carb
    }
}
