pub mod constraints_solver;
pub mod plan_render;
pub mod planner_model;
pub mod shopping;
