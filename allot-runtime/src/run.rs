use crate::Instance;
use allot_algorithms::{
    ampl::{self, AmplOptions},
    classroom as classroom_solvers, solver_kind, transport as transport_solvers, SolverKind,
};
use allot_challenges::{classroom, transport};
use allot_structs::results::{Family, ResultsFile, RunRecord, Status};
use allot_utils::dejsonify;
use anyhow::{anyhow, Result};
use log::{error, warn};
use serde_json::{Map, Value};
use std::{path::PathBuf, time::Instant};

#[derive(Clone, Debug, PartialEq)]
pub struct RunOptions {
    pub hyperparameters: Option<Map<String, Value>>,
    pub ampl_executable: String,
    pub ampl_folder: PathBuf,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            hyperparameters: None,
            ampl_executable: "ampl".to_string(),
            ampl_folder: PathBuf::from("ampl"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunOutcome {
    pub record: RunRecord,
    pub solution: Option<Value>,
    /// Set when the solver itself failed. The record is then a failure.
    pub error: Option<String>,
}

fn status_for(kind: SolverKind) -> Status {
    match kind {
        SolverKind::Exact => Status::Optimal,
        SolverKind::Heuristic => Status::Approximate,
    }
}

fn status_without_solution(kind: SolverKind) -> Status {
    match kind {
        SolverKind::Exact => Status::Infeasible,
        SolverKind::Heuristic => Status::Failure,
    }
}

fn shares_rooms(hyperparameters: &Option<Map<String, Value>>) -> bool {
    hyperparameters
        .as_ref()
        .and_then(|m| m.get("shared_rooms"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Verifies a solution and returns its cost.
fn check(instance: &Instance, solution: &Value, shared_rooms: bool) -> Result<u64> {
    match instance {
        Instance::Classroom(c) => {
            let solution: classroom::Solution = serde_json::from_value(solution.clone())?;
            if shared_rooms {
                c.verify_shared_capacity(&solution)?;
            } else {
                c.verify_solution(&solution)?;
            }
            c.evaluate_total_cost(&solution)
        }
        Instance::Transport(c) => {
            let solution: transport::Solution = serde_json::from_value(solution.clone())?;
            c.verify_solution(&solution)?;
            c.evaluate_total_cost(&solution)
        }
    }
}

fn dispatch(
    instance: &Instance,
    code: &str,
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<Option<Value>> {
    Ok(match instance {
        Instance::Classroom(c) => classroom_solvers::solve_challenge(code, c, hyperparameters)?
            .map(serde_json::to_value)
            .transpose()?,
        Instance::Transport(c) => transport_solvers::solve_challenge(code, c, hyperparameters)?
            .map(serde_json::to_value)
            .transpose()?,
    })
}

fn compute_with_ampl(
    instance: &Instance,
    instance_name: &str,
    code: &str,
    solver: &str,
    options: &RunOptions,
) -> RunOutcome {
    let ampl_options = AmplOptions {
        executable: options.ampl_executable.clone(),
        solver: solver.to_string(),
        folder: options.ampl_folder.clone(),
    };
    let start = Instant::now();
    let result = match instance {
        Instance::Classroom(c) => ampl::solve(c, instance_name, &ampl_options),
        Instance::Transport(c) => ampl::solve(c, instance_name, &ampl_options),
    };
    let time = start.elapsed().as_secs_f64();
    match result {
        Ok(outcome) => {
            let cost = match (outcome.status.has_cost(), outcome.objective) {
                (true, Some(objective)) => objective,
                _ => -1.0,
            };
            RunOutcome {
                record: RunRecord::new(outcome.status, cost, time, code),
                solution: None,
                error: None,
            }
        }
        Err(e) => RunOutcome {
            record: RunRecord::failure(time, code),
            solution: None,
            error: Some(e.to_string()),
        },
    }
}

/// Solves `instance` once with solver `code`, timing only the solver call.
pub fn compute_solution(
    instance: &Instance,
    instance_name: &str,
    code: &str,
    options: &RunOptions,
) -> Result<RunOutcome> {
    let kind = solver_kind(instance.family(), code)?;
    if let Some(solver) = ampl::solver_from_code(code) {
        return Ok(compute_with_ampl(instance, instance_name, code, solver, options));
    }

    let start = Instant::now();
    let result = dispatch(instance, code, &options.hyperparameters);
    let time = start.elapsed().as_secs_f64();

    let outcome = match result {
        Ok(Some(solution)) => match check(
            instance,
            &solution,
            code == "greedy" && shares_rooms(&options.hyperparameters),
        ) {
            Ok(cost) => RunOutcome {
                record: RunRecord::new(status_for(kind), cost as f64, time, code),
                solution: Some(solution),
                error: None,
            },
            Err(e) => {
                warn!("{} returned an invalid solution: {}", code, e);
                RunOutcome {
                    record: RunRecord::failure(time, code),
                    solution: Some(solution),
                    error: None,
                }
            }
        },
        Ok(None) => RunOutcome {
            record: RunRecord::new(status_without_solution(kind), -1.0, time, code),
            solution: None,
            error: None,
        },
        Err(e) => {
            error!("{} failed: {}", code, e);
            RunOutcome {
                record: RunRecord::failure(time, code),
                solution: None,
                error: Some(e.to_string()),
            }
        }
    };
    Ok(outcome)
}

/// Appends a run to `{folder}/{family}_{instance}_results.csv`.
pub fn record_run(
    folder: &str,
    family: Family,
    instance_name: &str,
    record: &RunRecord,
) -> Result<ResultsFile> {
    let results = ResultsFile::new(folder, family, instance_name);
    results.append(record)?;
    Ok(results)
}

/// Verifies a solution given as json and returns its cost.
pub fn verify_solution(instance: &Instance, solution_json: &str) -> Result<u64> {
    let solution: Value =
        dejsonify(solution_json).map_err(|e| anyhow!("Failed to parse solution: {}", e))?;
    check(instance, &solution, false)
}
