mod catalog;
mod ingredient;
mod recipe;
mod rules;
mod slot;
mod variant;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use catalog::*;
pub use ingredient::*;
pub use recipe::*;
pub use rules::*;
pub use slot::*;
pub use variant::*;
