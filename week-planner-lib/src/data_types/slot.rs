use super::recipe::MealType;
use super::rules::WeekShape;

/// A (day, meal) coordinate in the week.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slot {
    pub day_index: usize,
    pub day_label: String,
    pub meal: MealType,
}

impl Slot {
    /// Textual slot identity used at the output boundary.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}_{}", self.day_label, self.meal)
    }
}

/// All slots of the week in canonical order: days as declared,
/// then meals as declared within each day.
#[must_use]
pub fn week_slots(week: &WeekShape) -> Vec<Slot> {
    let mut slots = Vec::with_capacity(week.days.len() * week.meals.len());
    for (day_index, day_label) in week.days.iter().enumerate() {
        for &meal in &week.meals {
            slots.push(Slot {
                day_index,
                day_label: day_label.clone(),
                meal,
            });
        }
    }
    slots
}
