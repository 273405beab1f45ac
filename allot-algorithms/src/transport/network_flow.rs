use crate::lp;
use allot_challenges::transport::{Challenge, Solution};
use anyhow::Result;
use microlp::{ComparisonOp, OptimizationDirection, Problem, Variable};
use serde_json::{Map, Value};

/// Min-cost flow `S -> sources -> destinations -> T`.
pub fn solve_challenge(
    challenge: &Challenge,
    _hyperparameters: &Option<Map<String, Value>>,
) -> Result<Option<Solution>> {
    let m = challenge.num_sources();
    let n = challenge.num_destinations();
    let mut problem = Problem::new(OptimizationDirection::Minimize);

    let from_source: Vec<Variable> = challenge
        .supplies
        .iter()
        .map(|&s| problem.add_var(0.0, (0.0, s as f64)))
        .collect();
    let mut x: Vec<Vec<Variable>> = Vec::with_capacity(m);
    for row in &challenge.costs {
        x.push(
            row.iter()
                .map(|&c| problem.add_var(c as f64, (0.0, f64::INFINITY)))
                .collect(),
        );
    }
    let to_sink: Vec<Variable> = (0..n)
        .map(|_| problem.add_var(0.0, (0.0, f64::INFINITY)))
        .collect();

    // conservation at every source and destination node
    for i in 0..m {
        let mut terms = vec![(from_source[i], 1.0)];
        terms.extend(x[i].iter().map(|&v| (v, -1.0)));
        problem.add_constraint(terms, ComparisonOp::Eq, 0.0);
    }
    for j in 0..n {
        let mut terms: Vec<(Variable, f64)> = x.iter().map(|row| (row[j], 1.0)).collect();
        terms.push((to_sink[j], -1.0));
        problem.add_constraint(terms, ComparisonOp::Eq, 0.0);
    }
    for (j, &t) in to_sink.iter().enumerate() {
        problem.add_constraint([(t, 1.0)], ComparisonOp::Ge, challenge.demands[j] as f64);
    }

    Ok(lp::solve(&problem)?.map(|solution| Solution {
        allocation: x
            .iter()
            .map(|row| row.iter().map(|&v| lp::integral_value(&solution, v)).collect())
            .collect(),
    }))
}
