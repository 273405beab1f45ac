use allot_challenges::transport::{Challenge, Solution};
use anyhow::Result;
use serde_json::{Map, Value};

/// Difference of the two smallest costs, or the cost itself when only one remains.
fn penalty(costs: impl Iterator<Item = u32>) -> Option<i64> {
    let mut smallest: Option<u32> = None;
    let mut second: Option<u32> = None;
    for c in costs {
        match smallest {
            Some(s) if c >= s => {
                if second.map_or(true, |t| c < t) {
                    second = Some(c);
                }
            }
            _ => {
                second = smallest;
                smallest = Some(c);
            }
        }
    }
    match (smallest, second) {
        (Some(s), Some(t)) => Some(t as i64 - s as i64),
        (Some(s), None) => Some(s as i64),
        _ => None,
    }
}

/// First index holding the largest penalty.
fn argmax(penalties: &[Option<i64>]) -> Option<(usize, i64)> {
    let mut best: Option<(usize, i64)> = None;
    for (idx, p) in penalties.iter().enumerate() {
        if let Some(p) = *p {
            if best.map_or(true, |(_, b)| p > b) {
                best = Some((idx, p));
            }
        }
    }
    best
}

/// Cheapest position among `candidates`, first one on ties.
fn cheapest(candidates: impl Iterator<Item = usize>, cost: impl Fn(usize) -> u32) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for k in candidates {
        let c = cost(k);
        if best.map_or(true, |(_, b)| c < b) {
            best = Some((k, c));
        }
    }
    best.map(|(k, _)| k)
}

pub fn solve_challenge(
    challenge: &Challenge,
    _hyperparameters: &Option<Map<String, Value>>,
) -> Result<Option<Solution>> {
    let m = challenge.num_sources();
    let n = challenge.num_destinations();
    let costs = &challenge.costs;
    let mut supply = challenge.supplies.clone();
    let mut demand = challenge.demands.clone();
    let mut row_done = vec![false; m];
    let mut col_done = vec![false; n];
    let mut solution = Solution::zeros(m, n);

    loop {
        let active_rows: Vec<usize> = (0..m).filter(|&i| !row_done[i]).collect();
        let active_cols: Vec<usize> = (0..n).filter(|&j| !col_done[j]).collect();
        if active_rows.is_empty() || active_cols.is_empty() {
            break;
        }
        let open_cols: Vec<usize> = active_cols
            .iter()
            .copied()
            .filter(|&j| demand[j] > 0)
            .collect();
        let open_rows: Vec<usize> = active_rows
            .iter()
            .copied()
            .filter(|&i| supply[i] > 0)
            .collect();

        let mut row_penalties: Vec<Option<i64>> = vec![None; m];
        for &i in &active_rows {
            row_penalties[i] = penalty(open_cols.iter().map(|&j| costs[i][j]));
        }
        let mut col_penalties: Vec<Option<i64>> = vec![None; n];
        for &j in &active_cols {
            col_penalties[j] = penalty(open_rows.iter().map(|&i| costs[i][j]));
        }

        let (i, j) = match (argmax(&row_penalties), argmax(&col_penalties)) {
            (Some((i, rp)), col) if col.map_or(true, |(_, cp)| rp >= cp) => {
                match cheapest(open_cols.iter().copied(), |j| costs[i][j]) {
                    Some(j) => (i, j),
                    None => break,
                }
            }
            (_, Some((j, _))) => match cheapest(open_rows.iter().copied(), |i| costs[i][j]) {
                Some(i) => (i, j),
                None => break,
            },
            // only zero supplies and zero demands are left
            _ => break,
        };

        let qty = supply[i].min(demand[j]);
        solution.allocation[i][j] += qty;
        supply[i] -= qty;
        demand[j] -= qty;
        if supply[i] == 0 {
            row_done[i] = true;
        }
        if demand[j] == 0 {
            col_done[j] = true;
        }
    }
    Ok(Some(solution))
}
