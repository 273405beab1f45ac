use allot_structs::results::Family;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

pub mod ampl;
pub mod classroom;
mod lap;
mod lp;
mod params;
pub mod transport;

pub use lap::solve_assignment;
pub use params::merge_hyperparameters;

/// Exact solvers report `optimal` runs, heuristics `approximate` ones.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    Heuristic,
    Exact,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolverInfo {
    pub id: &'static str,
    pub kind: SolverKind,
    pub description: &'static str,
}

pub fn solvers(family: Family) -> &'static [SolverInfo] {
    match family {
        Family::Classroom => classroom::SOLVERS,
        Family::Transport => transport::SOLVERS,
    }
}

/// Kind of a solver code, including `ampl_<solver>` codes.
pub fn solver_kind(family: Family, code: &str) -> Result<SolverKind> {
    if ampl::solver_from_code(code).is_some() {
        return Ok(SolverKind::Exact);
    }
    solvers(family)
        .iter()
        .find(|s| s.id == code)
        .map(|s| s.kind)
        .ok_or_else(|| {
            anyhow!(
                "Unknown {} solver '{}' (available: {})",
                family,
                code,
                solvers(family)
                    .iter()
                    .map(|s| s.id)
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
}
