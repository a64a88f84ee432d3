use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use microlp::ComparisonOp;
use strum::IntoEnumIterator;

use super::planner_model::PlannerModel;
use crate::data_types::{Catalog, MealType, ProteinType, RecipeVariant, Slot};
use crate::error::PlannerError;

#[derive(Debug, Clone, Copy)]
pub struct SolveOptions {
    pub seed: u64,
    pub timeout: Duration,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            timeout: Duration::from_secs(30),
        }
    }
}

/// A total assignment of one variant per slot, in canonical slot
/// order. Variants are referenced by index into the variant table the
/// solver was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    slots: Vec<Slot>,
    chosen: Vec<usize>,
}

impl Assignment {
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    #[must_use]
    pub fn chosen(&self) -> &[usize] {
        &self.chosen
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Canonical-order traversal of (slot, chosen variant).
    pub fn iter<'a>(
        &'a self,
        variants: &'a [RecipeVariant],
    ) -> impl Iterator<Item = (&'a Slot, &'a RecipeVariant)> + 'a {
        self.slots
            .iter()
            .zip(self.chosen.iter().map(move |&index| &variants[index]))
    }
}

/// Encodes the weekly planning constraints over a [`PlannerModel`]
/// and drives the back-end to a deterministic assignment.
pub struct PlanSolver<'a> {
    catalog: &'a Catalog,
    variants: &'a [RecipeVariant],
    model: PlannerModel,
}

impl<'a> PlanSolver<'a> {
    #[must_use]
    pub fn new(catalog: &'a Catalog, variants: &'a [RecipeVariant], seed: u64) -> Self {
        let model = PlannerModel::new(catalog.rules(), variants, seed);
        let mut solver = Self {
            catalog,
            variants,
            model,
        };
        solver.add_weekly_protein_constraints();
        solver.add_consecutive_protein_constraints();
        solver.add_fish_dinner_constraints();
        solver.add_meal_carb_rules();
        solver.add_carb_frequency_constraints();
        solver.add_recipe_frequency_constraints();
        solver
    }

    /// Weekly protein balance: listed proteins hit their target count
    /// exactly; proteins absent from the table stay unconstrained.
    fn add_weekly_protein_constraints(&mut self) {
        let counts = &self.catalog.rules().constraints.weekly_protein_counts;
        for protein in ProteinType::iter() {
            let Some(&count) = counts.get(&protein) else {
                continue;
            };
            let mut terms = Vec::new();
            for slot_index in 0..self.model.slots.len() {
                terms.extend(self.model.terms_matching(slot_index, self.variants, |v| {
                    v.recipe.primary_protein() == protein
                }));
            }
            self.model
                .add_constraint_if_nonempty(terms, ComparisonOp::Eq, f64::from(count));
        }
    }

    /// No consecutive same protein, applied per meal type: beef at
    /// lunch today does not block beef at dinner today.
    fn add_consecutive_protein_constraints(&mut self) {
        let rules = self.catalog.rules();
        if !rules.constraints.no_consecutive_same_protein {
            return;
        }
        let meal_count = rules.week.meals.len();
        for protein in ProteinType::iter() {
            for meal_index in 0..meal_count {
                for day_index in 0..rules.week.days.len().saturating_sub(1) {
                    let current = day_index * meal_count + meal_index;
                    let next = (day_index + 1) * meal_count + meal_index;
                    let mut current_terms =
                        self.model.terms_matching(current, self.variants, |v| {
                            v.recipe.primary_protein() == protein
                        });
                    let next_terms = self.model.terms_matching(next, self.variants, |v| {
                        v.recipe.primary_protein() == protein
                    });
                    if current_terms.is_empty() || next_terms.is_empty() {
                        continue;
                    }
                    current_terms.extend(next_terms);
                    self.model
                        .add_constraint_if_nonempty(current_terms, ComparisonOp::Le, 1.0);
                }
            }
        }
    }

    /// Fish-dinner weekly cap and the 3-day sliding window.
    fn add_fish_dinner_constraints(&mut self) {
        let rules = self.catalog.rules();
        let Some(dinner_index) = rules
            .week
            .meals
            .iter()
            .position(|&meal| meal == MealType::Dinner)
        else {
            return;
        };
        let meal_count = rules.week.meals.len();

        let fish_terms_by_day: Vec<_> = (0..rules.week.days.len())
            .map(|day_index| {
                let slot_index = day_index * meal_count + dinner_index;
                self.model.terms_matching(slot_index, self.variants, |v| {
                    v.recipe.primary_protein() == ProteinType::Fish
                })
            })
            .collect();

        let weekly: Vec<_> = fish_terms_by_day.iter().flatten().copied().collect();
        self.model.add_constraint_if_nonempty(
            weekly,
            ComparisonOp::Le,
            f64::from(rules.constraints.fish_dinner_max_per_week),
        );

        for window in fish_terms_by_day.windows(3) {
            let terms: Vec<_> = window.iter().flatten().copied().collect();
            self.model.add_constraint_if_nonempty(
                terms,
                ComparisonOp::Le,
                f64::from(rules.constraints.fish_dinner_max_consecutive),
            );
        }
    }

    /// Meals with carbs disallowed take no carb-bearing variant. The
    /// no-carb variant of OPTIONAL recipes keeps them schedulable.
    fn add_meal_carb_rules(&mut self) {
        let rules = self.catalog.rules();
        for &meal in &rules.week.meals {
            if rules.allows_carbs_at(meal) {
                continue;
            }
            for slot_index in 0..self.model.slots.len() {
                if self.model.slots[slot_index].meal != meal {
                    continue;
                }
                let terms = self
                    .model
                    .terms_matching(slot_index, self.variants, RecipeVariant::has_carb);
                self.model
                    .add_constraint_if_nonempty(terms, ComparisonOp::Eq, 0.0);
            }
        }
    }

    /// Per-carb weekly frequency caps from the ingredient catalog.
    fn add_carb_frequency_constraints(&mut self) {
        let limited: Vec<(String, u32)> = self
            .catalog
            .ingredients()
            .iter()
            .filter(|(_, ing)| ing.is_carb())
            .filter_map(|(id, ing)| ing.max_times_week.map(|limit| (id.clone(), limit)))
            .collect();

        for (carb_id, limit) in limited {
            let mut terms = Vec::new();
            for slot_index in 0..self.model.slots.len() {
                terms.extend(self.model.terms_matching(slot_index, self.variants, |v| {
                    v.carb_ingredient_id.as_deref() == Some(carb_id.as_str())
                }));
            }
            self.model
                .add_constraint_if_nonempty(terms, ComparisonOp::Le, f64::from(limit));
        }
    }

    /// Each base recipe is scheduled at most `max_recipe_uses_per_week`
    /// times, across all of its variants.
    fn add_recipe_frequency_constraints(&mut self) {
        let max_uses = f64::from(self.catalog.rules().constraints.max_recipe_uses_per_week);
        let recipe_ids: Vec<String> = self.catalog.recipes().keys().cloned().collect();
        for recipe_id in recipe_ids {
            let mut terms = Vec::new();
            for slot_index in 0..self.model.slots.len() {
                terms.extend(self.model.terms_matching(slot_index, self.variants, |v| {
                    v.base_recipe_id == recipe_id
                }));
            }
            self.model
                .add_constraint_if_nonempty(terms, ComparisonOp::Le, max_uses);
        }
    }

    /// Run the blocking solve on a worker thread with a deadline and
    /// extract the assignment in canonical order. A worker that dies
    /// without reporting is surfaced as an error, never as a partial
    /// assignment.
    pub fn solve(self, timeout: Duration) -> Result<Assignment, PlannerError> {
        if let Some(slot_id) = self.model.uncovered_slot {
            return Err(PlannerError::Infeasible(format!(
                "slot {slot_id} has no recipe variant admissible for its meal"
            )));
        }

        let PlannerModel {
            problem,
            slots,
            vars,
            ..
        } = self.model;

        let (sender, receiver) = mpsc::channel();
        thread::Builder::new()
            .name("week-planner-solve".to_string())
            .spawn(move || {
                let _ = sender.send(problem.solve());
            })
            .map_err(|err| PlannerError::Solver(format!("failed to start solver: {err}")))?;

        let outcome = match receiver.recv_timeout(timeout) {
            Ok(outcome) => outcome,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                return Err(PlannerError::SolverTimeout(timeout));
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                return Err(PlannerError::Solver(
                    "solver stopped without reporting a status".to_string(),
                ));
            }
        };

        #[allow(clippy::match_wildcard_for_single_variants)]
        let solution = match outcome {
            Ok(solution) => solution,
            Err(microlp::Error::Infeasible) => {
                return Err(PlannerError::Infeasible(
                    "no assignment satisfies the weekly constraints".to_string(),
                ));
            }
            Err(err) => {
                return Err(PlannerError::Solver(format!(
                    "unexpected solver status: {err:?}"
                )));
            }
        };

        let mut chosen = Vec::with_capacity(slots.len());
        for (slot_index, slot) in slots.iter().enumerate() {
            let picked = vars[slot_index]
                .iter()
                .enumerate()
                .find_map(|(variant_index, var)| {
                    var.filter(|&v| *solution.var_value(v) > 0.5)
                        .map(|_| variant_index)
                });
            let Some(variant_index) = picked else {
                return Err(PlannerError::Solver(format!(
                    "no variant selected for slot {}",
                    slot.id()
                )));
            };
            chosen.push(variant_index);
        }

        tracing::debug!(slots = slots.len(), "solver produced an assignment");
        Ok(Assignment { slots, chosen })
    }
}

/// Build the model, post all planning constraints and solve.
pub fn solve_plan(
    catalog: &Catalog,
    variants: &[RecipeVariant],
    options: &SolveOptions,
) -> Result<Assignment, PlannerError> {
    PlanSolver::new(catalog, variants, options.seed).solve(options.timeout)
}
