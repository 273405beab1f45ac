use allot_challenges::transport::{Challenge, Solution};
use anyhow::Result;
use serde_json::{Map, Value};

/// All cells by ascending cost, row-major among equal costs.
pub fn cells_by_cost(challenge: &Challenge) -> Vec<(usize, usize)> {
    let mut cells: Vec<(usize, usize)> = (0..challenge.num_sources())
        .flat_map(|i| (0..challenge.num_destinations()).map(move |j| (i, j)))
        .collect();
    cells.sort_by_key(|&(i, j)| challenge.costs[i][j]);
    cells
}

/// Ships `min(supply, demand)` into each cell in `order`, adding to `allocation`.
pub fn fill(
    order: &[(usize, usize)],
    supply: &mut [u32],
    demand: &mut [u32],
    allocation: &mut [Vec<u32>],
) {
    for &(i, j) in order {
        if supply[i] == 0 || demand[j] == 0 {
            continue;
        }
        let qty = supply[i].min(demand[j]);
        allocation[i][j] += qty;
        supply[i] -= qty;
        demand[j] -= qty;
    }
}

pub fn solve_challenge(
    challenge: &Challenge,
    _hyperparameters: &Option<Map<String, Value>>,
) -> Result<Option<Solution>> {
    let mut solution = Solution::zeros(challenge.num_sources(), challenge.num_destinations());
    fill(
        &cells_by_cost(challenge),
        &mut challenge.supplies.clone(),
        &mut challenge.demands.clone(),
        &mut solution.allocation,
    );
    Ok(Some(solution))
}
