use allot_challenges::transport::{Challenge, Solution};
use anyhow::Result;
use serde_json::{Map, Value};

pub fn solve_challenge(
    challenge: &Challenge,
    _hyperparameters: &Option<Map<String, Value>>,
) -> Result<Option<Solution>> {
    let m = challenge.num_sources();
    let n = challenge.num_destinations();
    let mut supply = challenge.supplies.clone();
    let mut demand = challenge.demands.clone();
    let mut solution = Solution::zeros(m, n);

    let (mut i, mut j) = (0, 0);
    while i < m && j < n {
        let qty = supply[i].min(demand[j]);
        solution.allocation[i][j] = qty;
        supply[i] -= qty;
        demand[j] -= qty;

        if supply[i] == 0 && demand[j] == 0 {
            if i + 1 < m && j + 1 < n {
                i += 1;
                j += 1;
            } else if j + 1 < n {
                j += 1;
            } else if i + 1 < m {
                i += 1;
            } else {
                break;
            }
        } else if supply[i] == 0 {
            i += 1;
        } else {
            j += 1;
        }
    }
    Ok(Some(solution))
}
