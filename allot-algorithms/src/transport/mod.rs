use crate::{SolverInfo, SolverKind};
use allot_challenges::transport::{Challenge, Solution};
use anyhow::{anyhow, Result};
use serde_json::{Map, Value};

pub mod classic;
pub mod genetic;
pub mod greedy;
pub mod network_flow;
pub mod northwest_corner;
pub mod vogel;

pub const SOLVERS: &[SolverInfo] = &[
    SolverInfo {
        id: "northwest_corner",
        kind: SolverKind::Heuristic,
        description: "Northwest corner rule",
    },
    SolverInfo {
        id: "vogel",
        kind: SolverKind::Heuristic,
        description: "Vogel's approximation method",
    },
    SolverInfo {
        id: "greedy",
        kind: SolverKind::Heuristic,
        description: "Cheapest cell first",
    },
    SolverInfo {
        id: "genetic",
        kind: SolverKind::Heuristic,
        description: "Genetic algorithm over repaired shipment matrices",
    },
    SolverInfo {
        id: "classic",
        kind: SolverKind::Exact,
        description: "Transportation model solved with microlp",
    },
    SolverInfo {
        id: "network_flow",
        kind: SolverKind::Exact,
        description: "Min-cost flow model through a super source and sink",
    },
];

pub fn solve_challenge(
    code: &str,
    challenge: &Challenge,
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<Option<Solution>> {
    match code {
        "northwest_corner" => northwest_corner::solve_challenge(challenge, hyperparameters),
        "vogel" => vogel::solve_challenge(challenge, hyperparameters),
        "greedy" => greedy::solve_challenge(challenge, hyperparameters),
        "genetic" => genetic::solve_challenge(challenge, hyperparameters),
        "classic" => classic::solve_challenge(challenge, hyperparameters),
        "network_flow" => network_flow::solve_challenge(challenge, hyperparameters),
        _ => Err(anyhow!("Unknown transport solver '{}'", code)),
    }
}
