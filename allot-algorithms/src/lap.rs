use anyhow::{anyhow, Result};

/// Minimum-cost assignment of every row to a distinct column, `O(n^2 m)`.
///
/// Rectangular matrices with `rows <= cols` are handled directly, which is
/// the same as padding with zero-cost dummy rows. Returns the column of each row.
pub fn solve_assignment(costs: &[Vec<i64>]) -> Result<Vec<usize>> {
    let n = costs.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    let m = costs[0].len();
    if let Some(i) = costs.iter().position(|row| row.len() != m) {
        return Err(anyhow!(
            "Cost row {} has {} columns, expected {}",
            i,
            costs[i].len(),
            m
        ));
    }
    if n > m {
        return Err(anyhow!(
            "Cannot assign {} rows to only {} columns",
            n,
            m
        ));
    }

    let inf = i64::MAX / 4;
    let mut u = vec![0i64; n + 1];
    let mut v = vec![0i64; m + 1];
    let mut p = vec![0usize; m + 1];
    let mut way = vec![0usize; m + 1];
    let mut minv = vec![inf; m + 1];
    let mut used = vec![false; m + 1];

    for i in 1..=n {
        p[0] = i;
        let mut j0 = 0usize;
        minv.iter_mut().for_each(|x| *x = inf);
        used.iter_mut().for_each(|x| *x = false);

        loop {
            used[j0] = true;
            let i0 = p[j0];
            let row = &costs[i0 - 1];
            let mut delta = inf;
            let mut j1 = 0usize;

            for j in 1..=m {
                if used[j] {
                    continue;
                }
                let cur = row[j - 1] - u[i0] - v[j];
                if cur < minv[j] {
                    minv[j] = cur;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }

            for j in 0..=m {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }

            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }

        // augment along the alternating path
        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut assignment = vec![0usize; n];
    for j in 1..=m {
        if p[j] > 0 {
            assignment[p[j] - 1] = j - 1;
        }
    }
    Ok(assignment)
}
