use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (Bessel corrected).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

/// Percentage gap of `cost` above `optimum`. An optimum of zero yields a gap of zero.
pub fn percentage_gap(cost: f64, optimum: f64) -> f64 {
    if optimum == 0.0 {
        0.0
    } else {
        100.0 * (cost - optimum) / optimum
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PairedTTest {
    pub statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: usize,
}

impl PairedTTest {
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Two-sided paired Student's t-test on `a[i] - b[i]`.
pub fn paired_t_test(a: &[f64], b: &[f64]) -> Result<PairedTTest> {
    if a.len() != b.len() {
        return Err(anyhow!(
            "Paired samples must have the same length ({} != {})",
            a.len(),
            b.len()
        ));
    }
    if a.len() < 2 {
        return Err(anyhow!("Paired t-test needs at least 2 observations"));
    }
    let diffs: Vec<f64> = a.iter().zip(b).map(|(x, y)| x - y).collect();
    let n = diffs.len();
    let degrees_of_freedom = n - 1;
    let mean_diff = mean(&diffs).unwrap_or(0.0);
    let sd = std_dev(&diffs).unwrap_or(0.0);

    if sd == 0.0 {
        // degenerate: every pair differs by the same amount
        let (statistic, p_value) = if mean_diff == 0.0 {
            (0.0, 1.0)
        } else {
            (mean_diff.signum() * f64::INFINITY, 0.0)
        };
        return Ok(PairedTTest {
            statistic,
            p_value,
            degrees_of_freedom,
        });
    }

    let statistic = mean_diff / (sd / (n as f64).sqrt());
    let dist = StudentsT::new(0.0, 1.0, degrees_of_freedom as f64)
        .map_err(|e| anyhow!("Failed to build Student's t distribution: {}", e))?;
    let p_value = (2.0 * (1.0 - dist.cdf(statistic.abs()))).clamp(0.0, 1.0);
    Ok(PairedTTest {
        statistic,
        p_value,
        degrees_of_freedom,
    })
}
