use std::time::Duration;

use thiserror::Error;

/// Failure kinds for the whole pipeline. Every message starts with the
/// kind name so callers and scripts can match on it verbatim.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("MissingFile: {0}")]
    MissingFile(String),

    #[error("SchemaError: {0}")]
    Schema(String),

    #[error("ReferentialError: {0}")]
    Referential(String),

    #[error("CarbPolicyError: {0}")]
    CarbPolicy(String),

    #[error("RulesCoverageError: {0}")]
    RulesCoverage(String),

    #[error("Infeasible: {0}")]
    Infeasible(String),

    #[error("SolverTimeout: solver did not finish within {}s", .0.as_secs())]
    SolverTimeout(Duration),

    #[error("SolverError: {0}")]
    Solver(String),
}
