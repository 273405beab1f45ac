use crate::{merge_hyperparameters, solve_assignment};
use allot_challenges::classroom::{Challenge, Solution};
use anyhow::Result;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct Params {
    /// Cost of a discipline/room pair that does not fit.
    pub penalty: i64,
}

impl Default for Params {
    fn default() -> Self {
        Self { penalty: 1_000_000 }
    }
}

pub fn solve_challenge(
    challenge: &Challenge,
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<Option<Solution>> {
    let params = merge_hyperparameters(Params::default(), hyperparameters)?;
    let n = challenge.num_disciplines();
    let m = challenge.num_rooms();
    if n > m {
        warn!("{} disciplines cannot be placed in {} rooms", n, m);
        return Ok(None);
    }

    // no set of fitting pairs may cost as much as a single penalised one
    let max_cost = (0..n)
        .flat_map(|i| (0..m).map(move |j| (i, j)))
        .filter(|&(i, j)| challenge.fits(i, j))
        .map(|(i, j)| challenge.cost(i, j))
        .max()
        .unwrap_or(0) as i64;
    let penalty = params.penalty.max(max_cost.saturating_mul(n as i64) + 1);

    let costs: Vec<Vec<i64>> = (0..n)
        .map(|i| {
            (0..m)
                .map(|j| {
                    if challenge.fits(i, j) {
                        challenge.cost(i, j) as i64
                    } else {
                        penalty
                    }
                })
                .collect()
        })
        .collect();

    let assignment = solve_assignment(&costs)?;
    if let Some(i) = (0..n).find(|&i| !challenge.fits(i, assignment[i])) {
        warn!(
            "Optimal assignment places {} in a room that is too small",
            challenge.disciplines[i]
        );
        return Ok(None);
    }
    Ok(Some(Solution { assignment }))
}
