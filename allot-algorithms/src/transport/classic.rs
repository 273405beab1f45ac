use crate::{lp, merge_hyperparameters};
use allot_challenges::transport::{Challenge, Solution};
use anyhow::Result;
use microlp::{ComparisonOp, OptimizationDirection, Problem, Variable};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default)]
pub struct Params {
    /// Integer shipment variables. The continuous model already has integral vertices.
    pub integer: bool,
}

pub fn solve_challenge(
    challenge: &Challenge,
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<Option<Solution>> {
    let params = merge_hyperparameters(Params::default(), hyperparameters)?;
    let m = challenge.num_sources();
    let n = challenge.num_destinations();

    let mut problem = Problem::new(OptimizationDirection::Minimize);
    let mut x: Vec<Vec<Variable>> = Vec::with_capacity(m);
    for i in 0..m {
        let mut row = Vec::with_capacity(n);
        for j in 0..n {
            let cost = challenge.costs[i][j] as f64;
            row.push(if params.integer {
                let bound = challenge.supplies[i].min(i32::MAX as u32) as i32;
                problem.add_integer_var(cost, (0, bound))
            } else {
                problem.add_var(cost, (0.0, f64::INFINITY))
            });
        }
        x.push(row);
    }

    for (i, row) in x.iter().enumerate() {
        problem.add_constraint(
            row.iter().map(|&v| (v, 1.0)),
            ComparisonOp::Le,
            challenge.supplies[i] as f64,
        );
    }
    for j in 0..n {
        problem.add_constraint(
            x.iter().map(|row| (row[j], 1.0)),
            ComparisonOp::Ge,
            challenge.demands[j] as f64,
        );
    }

    Ok(lp::solve(&problem)?.map(|solution| Solution {
        allocation: x
            .iter()
            .map(|row| row.iter().map(|&v| lp::integral_value(&solution, v)).collect())
            .collect(),
    }))
}
