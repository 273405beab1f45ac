use crate::merge_hyperparameters;
use allot_challenges::classroom::{Challenge, Solution};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default)]
pub struct Params {
    /// Keep filling a room while its remaining seats suffice.
    pub shared_rooms: bool,
}

pub fn solve_challenge(
    challenge: &Challenge,
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<Option<Solution>> {
    let params = merge_hyperparameters(Params::default(), hyperparameters)?;
    let n = challenge.num_disciplines();
    let m = challenge.num_rooms();

    let mut triples: Vec<(u32, usize, usize)> = Vec::with_capacity(n * m);
    for (i, row) in challenge.distances.iter().enumerate() {
        for (j, &d) in row.iter().enumerate() {
            triples.push((d, i, j));
        }
    }
    triples.sort_unstable();

    let mut remaining: Vec<u64> = challenge.capacities.iter().map(|&c| c as u64).collect();
    let mut occupied = vec![false; m];
    let mut assignment: Vec<Option<usize>> = vec![None; n];
    let mut num_assigned = 0;

    for (_, i, j) in triples {
        if num_assigned == n {
            break;
        }
        if assignment[i].is_some() || occupied[j] {
            continue;
        }
        let students = challenge.students[i] as u64;
        if students > remaining[j] {
            continue;
        }
        assignment[i] = Some(j);
        num_assigned += 1;
        if params.shared_rooms {
            remaining[j] -= students;
        } else {
            occupied[j] = true;
        }
    }

    Ok(assignment
        .into_iter()
        .collect::<Option<Vec<usize>>>()
        .map(|assignment| Solution { assignment }))
}
