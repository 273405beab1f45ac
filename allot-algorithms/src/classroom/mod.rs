use crate::{SolverInfo, SolverKind};
use allot_challenges::classroom::{Challenge, Solution};
use anyhow::{anyhow, Result};
use serde_json::{Map, Value};

pub mod exact;
pub mod greedy;
pub mod hungarian;

pub const SOLVERS: &[SolverInfo] = &[
    SolverInfo {
        id: "greedy",
        kind: SolverKind::Heuristic,
        description: "Nearest room first, by ascending distance",
    },
    SolverInfo {
        id: "hungarian",
        kind: SolverKind::Exact,
        description: "Hungarian method on the capacity-penalised cost matrix",
    },
    SolverInfo {
        id: "exact",
        kind: SolverKind::Exact,
        description: "Assignment model solved with microlp",
    },
];

pub fn solve_challenge(
    code: &str,
    challenge: &Challenge,
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<Option<Solution>> {
    match code {
        "greedy" => greedy::solve_challenge(challenge, hyperparameters),
        "hungarian" => hungarian::solve_challenge(challenge, hyperparameters),
        "exact" => exact::solve_challenge(challenge, hyperparameters),
        _ => Err(anyhow!("Unknown classroom solver '{}'", code)),
    }
}
