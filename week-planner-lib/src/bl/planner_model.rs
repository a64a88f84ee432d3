use microlp::{ComparisonOp, OptimizationDirection, Problem, Variable};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data_types::{week_slots, RecipeVariant, Rules, Slot};

/// The 0/1 program over slots x variants. One integer variable with
/// bounds (0, 1) exists for each pair whose recipe permits the slot's
/// meal; inadmissible pairs get no variable at all.
///
/// The back-end has no random-seed parameter, so the seed enters as
/// tie-breaking objective weights: every variable gets a coefficient
/// drawn from a seeded generator in creation order and the problem
/// minimizes the weighted sum. Feasibility is untouched; the weights
/// only pick which satisfying assignment comes back, and the solve
/// itself is deterministic, so one seed always yields one plan.
pub struct PlannerModel {
    pub(crate) problem: Problem,
    pub(crate) slots: Vec<Slot>,
    pub(crate) vars: Vec<Vec<Option<Variable>>>,
    pub(crate) uncovered_slot: Option<String>,
}

impl PlannerModel {
    pub(crate) fn new(rules: &Rules, variants: &[RecipeVariant], seed: u64) -> Self {
        let mut problem = Problem::new(OptimizationDirection::Minimize);
        let slots = week_slots(&rules.week);
        let mut rng = StdRng::seed_from_u64(seed);

        let mut vars: Vec<Vec<Option<Variable>>> = Vec::with_capacity(slots.len());
        let mut uncovered_slot = None;

        for slot in &slots {
            let mut slot_vars = Vec::with_capacity(variants.len());
            let mut coverage = Vec::new();
            for variant in variants {
                if variant.allows_meal(slot.meal) {
                    let weight = rng.gen_range(0.0..1.0);
                    let var = problem.add_integer_var(weight, (0, 1));
                    slot_vars.push(Some(var));
                    coverage.push((var, 1.0));
                } else {
                    slot_vars.push(None);
                }
            }
            if coverage.is_empty() {
                // No admissible variant: the model is infeasible by
                // construction; remember the slot for the error.
                uncovered_slot.get_or_insert_with(|| slot.id());
            } else {
                problem.add_constraint(coverage, ComparisonOp::Eq, 1.0);
            }
            vars.push(slot_vars);
        }

        tracing::debug!(
            slots = slots.len(),
            variants = variants.len(),
            "built planner model"
        );

        Self {
            problem,
            slots,
            vars,
            uncovered_slot,
        }
    }

    /// Variables of one slot whose variant matches `predicate`, as
    /// unit-coefficient terms ready for constraint posting.
    pub(crate) fn terms_matching<F>(
        &self,
        slot_index: usize,
        variants: &[RecipeVariant],
        predicate: F,
    ) -> Vec<(Variable, f64)>
    where
        F: Fn(&RecipeVariant) -> bool,
    {
        self.vars[slot_index]
            .iter()
            .enumerate()
            .filter_map(|(variant_index, var)| {
                var.filter(|_| predicate(&variants[variant_index]))
                    .map(|var| (var, 1.0))
            })
            .collect()
    }

    /// Empty left-hand sides are omitted, never posted.
    pub(crate) fn add_constraint_if_nonempty(
        &mut self,
        terms: Vec<(Variable, f64)>,
        op: ComparisonOp,
        rhs: f64,
    ) {
        if !terms.is_empty() {
            self.problem.add_constraint(terms, op, rhs);
        }
    }
}
