use crate::{lp, merge_hyperparameters};
use allot_challenges::classroom::{Challenge, Solution};
use anyhow::{anyhow, Result};
use microlp::{ComparisonOp, OptimizationDirection, Problem, Variable};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct Params {
    /// Solve the LP relaxation instead of the binary model.
    pub relax: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self { relax: true }
    }
}

pub fn solve_challenge(
    challenge: &Challenge,
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<Option<Solution>> {
    let params = merge_hyperparameters(Params::default(), hyperparameters)?;
    let n = challenge.num_disciplines();
    let m = challenge.num_rooms();

    let mut problem = Problem::new(OptimizationDirection::Minimize);
    // pairs that do not fit get no variable
    let mut x: Vec<Vec<Option<Variable>>> = vec![vec![None; m]; n];
    for i in 0..n {
        for j in 0..m {
            if !challenge.fits(i, j) {
                continue;
            }
            let cost = challenge.cost(i, j) as f64;
            x[i][j] = Some(if params.relax {
                problem.add_var(cost, (0.0, 1.0))
            } else {
                problem.add_binary_var(cost)
            });
        }
    }

    for (i, row) in x.iter().enumerate() {
        let terms: Vec<(Variable, f64)> = row.iter().flatten().map(|&v| (v, 1.0)).collect();
        if terms.is_empty() {
            log::warn!("{} fits no room", challenge.disciplines[i]);
            return Ok(None);
        }
        problem.add_constraint(terms, ComparisonOp::Eq, 1.0);
    }
    for j in 0..m {
        let terms: Vec<(Variable, f64)> = x
            .iter()
            .filter_map(|row| row[j])
            .map(|v| (v, 1.0))
            .collect();
        if !terms.is_empty() {
            problem.add_constraint(terms, ComparisonOp::Le, 1.0);
        }
    }

    let solution = match lp::solve(&problem)? {
        Some(solution) => solution,
        None => return Ok(None),
    };

    let mut assignment = Vec::with_capacity(n);
    for (i, row) in x.iter().enumerate() {
        let (room, value) = row
            .iter()
            .enumerate()
            .filter_map(|(j, v)| v.map(|v| (j, solution[v])))
            .fold((usize::MAX, f64::NEG_INFINITY), |best, cur| {
                if cur.1 > best.1 {
                    cur
                } else {
                    best
                }
            });
        if value < 1.0 - 1e-6 {
            return Err(anyhow!(
                "Fractional value {} for {}; retry with relax=false",
                value,
                challenge.disciplines[i]
            ));
        }
        assignment.push(room);
    }
    Ok(Some(Solution { assignment }))
}
