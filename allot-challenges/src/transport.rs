use crate::{check_range, parse_fields, read_rows, write_rows};
use anyhow::{anyhow, Result};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::{from_value, Map, Value};
use std::path::Path;

fn default_min_value() -> u32 {
    1
}
fn default_max_value() -> u32 {
    100
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct Difficulty {
    pub num_sources: usize,
    pub num_destinations: usize,
    #[serde(default = "default_min_value")]
    pub min_value: u32,
    #[serde(default = "default_max_value")]
    pub max_value: u32,
}

impl Difficulty {
    pub fn new(num_sources: usize, num_destinations: usize) -> Self {
        Self {
            num_sources,
            num_destinations,
            min_value: default_min_value(),
            max_value: default_max_value(),
        }
    }

    pub fn instance_name(&self, seed: u64) -> String {
        format!(
            "{}x{}_[{},{}]_seed{}",
            self.num_sources, self.num_destinations, self.min_value, self.max_value, seed
        )
    }

    pub fn file_name(&self, seed: u64) -> String {
        format!("transport_{}.csv", self.instance_name(seed))
    }
}

impl From<Vec<usize>> for Difficulty {
    fn from(arr: Vec<usize>) -> Self {
        let num_sources = arr.first().copied().unwrap_or(0);
        Self::new(num_sources, arr.get(1).copied().unwrap_or(num_sources))
    }
}

/// Units shipped from source `i` to destination `j`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Solution {
    pub allocation: Vec<Vec<u32>>,
}

impl Solution {
    pub fn zeros(num_sources: usize, num_destinations: usize) -> Self {
        Self {
            allocation: vec![vec![0; num_destinations]; num_sources],
        }
    }
}

impl TryFrom<Map<String, Value>> for Solution {
    type Error = serde_json::Error;

    fn try_from(v: Map<String, Value>) -> Result<Self, Self::Error> {
        from_value(Value::Object(v))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Challenge {
    pub supplies: Vec<u32>,
    pub demands: Vec<u32>,
    pub costs: Vec<Vec<u32>>,
}

impl Challenge {
    pub fn new(supplies: Vec<u32>, demands: Vec<u32>, costs: Vec<Vec<u32>>) -> Result<Self> {
        if costs.len() != supplies.len() {
            return Err(anyhow!(
                "Cost matrix has {} rows, expected {}",
                costs.len(),
                supplies.len()
            ));
        }
        if let Some((i, row)) = costs
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != demands.len())
        {
            return Err(anyhow!(
                "Cost row {} has {} entries, expected {}",
                i,
                row.len(),
                demands.len()
            ));
        }
        let challenge = Self {
            supplies,
            demands,
            costs,
        };
        if challenge.total_demand() > challenge.total_supply() {
            return Err(anyhow!(
                "Total demand ({}) exceeds total supply ({})",
                challenge.total_demand(),
                challenge.total_supply()
            ));
        }
        Ok(challenge)
    }

    pub fn generate_instance(seed: u64, difficulty: &Difficulty) -> Result<Self> {
        if difficulty.num_sources == 0 || difficulty.num_destinations == 0 {
            return Err(anyhow!("Instance needs at least one source and one destination"));
        }
        check_range("value", difficulty.min_value, difficulty.max_value)?;
        let mut rng = SmallRng::seed_from_u64(seed);
        let (m, n) = (difficulty.num_sources, difficulty.num_destinations);

        let costs: Vec<Vec<u32>> = (0..m)
            .map(|_| {
                (0..n)
                    .map(|_| rng.gen_range(difficulty.min_value..=difficulty.max_value))
                    .collect()
            })
            .collect();
        let supplies: Vec<u32> = (0..m)
            .map(|_| rng.gen_range(difficulty.min_value..=difficulty.max_value))
            .collect();
        let total_supply = supplies.iter().map(|&s| s as f64).sum::<f64>();

        let weights: Vec<f64> = (0..n).map(|_| rng.gen::<f64>()).collect();
        let weight_sum = weights.iter().sum::<f64>();
        let scale = rng.gen_range(0.5..1.0);
        let demands: Vec<u32> = weights
            .iter()
            .map(|w| {
                if weight_sum > 0.0 {
                    (w / weight_sum * total_supply * scale).floor() as u32
                } else {
                    0
                }
            })
            .collect();

        Ok(Self {
            supplies,
            demands,
            costs,
        })
    }

    pub fn num_sources(&self) -> usize {
        self.supplies.len()
    }

    pub fn num_destinations(&self) -> usize {
        self.demands.len()
    }

    pub fn total_supply(&self) -> u64 {
        self.supplies.iter().map(|&s| s as u64).sum()
    }

    pub fn total_demand(&self) -> u64 {
        self.demands.iter().map(|&d| d as u64).sum()
    }

    fn check_shape(&self, solution: &Solution) -> Result<()> {
        if solution.allocation.len() != self.num_sources() {
            return Err(anyhow!(
                "Allocation has {} rows, expected {}",
                solution.allocation.len(),
                self.num_sources()
            ));
        }
        if let Some((i, row)) = solution
            .allocation
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.num_destinations())
        {
            return Err(anyhow!(
                "Allocation row {} has {} entries, expected {}",
                i,
                row.len(),
                self.num_destinations()
            ));
        }
        Ok(())
    }

    pub fn verify_solution(&self, solution: &Solution) -> Result<()> {
        self.check_shape(solution)?;
        for (i, row) in solution.allocation.iter().enumerate() {
            let shipped: u64 = row.iter().map(|&x| x as u64).sum();
            if shipped > self.supplies[i] as u64 {
                return Err(anyhow!(
                    "Source {} ships {} units but only supplies {}",
                    i,
                    shipped,
                    self.supplies[i]
                ));
            }
        }
        for j in 0..self.num_destinations() {
            let received: u64 = solution.allocation.iter().map(|row| row[j] as u64).sum();
            if received < self.demands[j] as u64 {
                return Err(anyhow!(
                    "Destination {} receives {} units but demands {}",
                    j,
                    received,
                    self.demands[j]
                ));
            }
        }
        Ok(())
    }

    pub fn evaluate_total_cost(&self, solution: &Solution) -> Result<u64> {
        self.check_shape(solution)?;
        Ok(solution
            .allocation
            .iter()
            .zip(&self.costs)
            .map(|(xs, cs)| {
                xs.iter()
                    .zip(cs)
                    .map(|(&x, &c)| x as u64 * c as u64)
                    .sum::<u64>()
            })
            .sum())
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let (m, n) = (self.num_sources(), self.num_destinations());
        let width = m.max(n).max(2);
        let pad = |mut row: Vec<String>| {
            row.resize(width, String::new());
            row
        };
        let mut rows = Vec::with_capacity(3 + m);
        rows.push(pad(vec![m.to_string(), n.to_string()]));
        rows.push(pad(self.supplies.iter().map(u32::to_string).collect()));
        rows.push(pad(self.demands.iter().map(u32::to_string).collect()));
        for row in &self.costs {
            rows.push(pad(row.iter().map(u32::to_string).collect()));
        }
        write_rows(path.as_ref(), &rows)
    }

    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let rows = read_rows(path)?;
        let dims = parse_fields::<usize>(&rows, 0, 2, "dimensions")
            .map_err(|e| anyhow!("{}: {}", path.display(), e))?;
        let (m, n) = (dims[0], dims[1]);
        if rows.len().checked_sub(3) != Some(m) {
            return Err(anyhow!(
                "{}: expected 3 header rows and {} cost rows, found {} rows",
                path.display(),
                m,
                rows.len()
            ));
        }
        let supplies = parse_fields::<u32>(&rows, 1, m, "supplies")?;
        let demands = parse_fields::<u32>(&rows, 2, n, "demands")?;
        let costs = (0..m)
            .map(|i| parse_fields::<u32>(&rows, 3 + i, n, "costs"))
            .collect::<Result<Vec<_>>>()?;
        Self::new(supplies, demands, costs)
    }
}
