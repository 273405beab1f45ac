use super::greedy;
use crate::merge_hyperparameters;
use allot_challenges::transport::{Challenge, Solution};
use anyhow::{anyhow, Result};
use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Params {
    pub population: usize,
    pub generations: usize,
    /// Crossover probability per consecutive pair.
    pub cxpb: f64,
    /// Mutation probability per individual.
    pub mutpb: f64,
    pub sigma: f64,
    /// Mutation probability per gene.
    pub indpb: f64,
    pub tournament: usize,
    pub seed: u64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            population: 100,
            generations: 100,
            cxpb: 0.8,
            mutpb: 0.2,
            sigma: 5.0,
            indpb: 0.2,
            tournament: 3,
            seed: 42,
        }
    }
}

#[derive(Clone, Debug)]
struct Individual {
    genes: Vec<f64>,
    fitness: Option<u64>,
}

/// Turns a real-valued genome into a feasible shipment matrix.
pub struct Repairer<'a> {
    challenge: &'a Challenge,
    order: Vec<(usize, usize)>,
}

impl<'a> Repairer<'a> {
    pub fn new(challenge: &'a Challenge) -> Self {
        Self {
            challenge,
            order: greedy::cells_by_cost(challenge),
        }
    }

    pub fn repair(&self, genes: &[f64]) -> Solution {
        let c = self.challenge;
        let (m, n) = (c.num_sources(), c.num_destinations());
        if n == 0 {
            return Solution::zeros(m, n);
        }
        let mut allocation: Vec<Vec<u32>> = genes
            .chunks(n)
            .take(m)
            .map(|row| row.iter().map(|&g| g.floor().max(0.0) as u32).collect())
            .collect();

        // drop the most expensive shipment until each source is within supply
        for i in 0..m {
            let supply = c.supplies[i] as u64;
            while allocation[i].iter().map(|&x| x as u64).sum::<u64>() > supply {
                let worst = (0..n)
                    .filter(|&j| allocation[i][j] > 0)
                    .fold(None, |best: Option<usize>, j| match best {
                        Some(b) if c.costs[i][b] >= c.costs[i][j] => Some(b),
                        _ => Some(j),
                    });
                match worst {
                    Some(j) => allocation[i][j] = 0,
                    None => break,
                }
            }
        }
        for j in 0..n {
            let demand = c.demands[j] as u64;
            while allocation.iter().map(|row| row[j] as u64).sum::<u64>() > demand {
                let worst = (0..m)
                    .filter(|&i| allocation[i][j] > 0)
                    .fold(None, |best: Option<usize>, i| match best {
                        Some(b) if c.costs[b][j] >= c.costs[i][j] => Some(b),
                        _ => Some(i),
                    });
                match worst {
                    Some(i) => allocation[i][j] = 0,
                    None => break,
                }
            }
        }

        let mut supply: Vec<u32> = (0..m)
            .map(|i| c.supplies[i].saturating_sub(allocation[i].iter().sum()))
            .collect();
        let mut demand: Vec<u32> = (0..n)
            .map(|j| {
                c.demands[j].saturating_sub(allocation.iter().map(|row| row[j]).sum())
            })
            .collect();
        greedy::fill(&self.order, &mut supply, &mut demand, &mut allocation);
        Solution { allocation }
    }

    pub fn fitness(&self, genes: &[f64]) -> u64 {
        let solution = self.repair(genes);
        solution
            .allocation
            .iter()
            .zip(&self.challenge.costs)
            .map(|(xs, cs)| {
                xs.iter()
                    .zip(cs)
                    .map(|(&x, &c)| x as u64 * c as u64)
                    .sum::<u64>()
            })
            .sum()
    }
}

fn tournament(population: &[Individual], size: usize, rng: &mut StdRng) -> Individual {
    let mut best = &population[rng.gen_range(0..population.len())];
    for _ in 1..size {
        let aspirant = &population[rng.gen_range(0..population.len())];
        if aspirant.fitness < best.fitness {
            best = aspirant;
        }
    }
    best.clone()
}

fn two_point_crossover(a: &mut [f64], b: &mut [f64], rng: &mut StdRng) {
    let size = a.len().min(b.len());
    if size < 2 {
        return;
    }
    let mut cx1 = rng.gen_range(1..=size);
    let mut cx2 = rng.gen_range(1..size);
    if cx2 >= cx1 {
        cx2 += 1;
    } else {
        std::mem::swap(&mut cx1, &mut cx2);
    }
    a[cx1..cx2].swap_with_slice(&mut b[cx1..cx2]);
}

fn gaussian_mutation(genes: &mut [f64], normal: &Normal<f64>, indpb: f64, rng: &mut StdRng) {
    for g in genes.iter_mut() {
        if rng.gen::<f64>() < indpb {
            *g += normal.sample(rng);
        }
    }
}

fn check_params(params: &Params) -> Result<()> {
    if params.population == 0 {
        return Err(anyhow!("population must be positive"));
    }
    if params.tournament == 0 {
        return Err(anyhow!("tournament must be positive"));
    }
    for (name, p) in [
        ("cxpb", params.cxpb),
        ("mutpb", params.mutpb),
        ("indpb", params.indpb),
    ] {
        if !(0.0..=1.0).contains(&p) {
            return Err(anyhow!("{} must be a probability, got {}", name, p));
        }
    }
    Ok(())
}

pub fn solve_challenge(
    challenge: &Challenge,
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<Option<Solution>> {
    let params = merge_hyperparameters(Params::default(), hyperparameters)?;
    check_params(&params)?;
    let normal = Normal::new(0.0, params.sigma)
        .map_err(|e| anyhow!("Invalid sigma {}: {}", params.sigma, e))?;
    let mut rng = StdRng::seed_from_u64(params.seed);
    let repairer = Repairer::new(challenge);

    let num_genes = challenge.num_sources() * challenge.num_destinations();
    if num_genes == 0 {
        return Ok(Some(repairer.repair(&[])));
    }
    let upper = challenge
        .supplies
        .iter()
        .chain(&challenge.demands)
        .copied()
        .max()
        .unwrap_or(0);

    let mut population: Vec<Individual> = (0..params.population)
        .map(|_| Individual {
            genes: (0..num_genes)
                .map(|_| rng.gen_range(0..=upper) as f64)
                .collect(),
            fitness: None,
        })
        .collect();

    let mut hall_of_fame: Option<Individual> = None;
    let evaluate = |population: &mut Vec<Individual>, hall_of_fame: &mut Option<Individual>| {
        for ind in population.iter_mut().filter(|ind| ind.fitness.is_none()) {
            ind.fitness = Some(repairer.fitness(&ind.genes));
        }
        for ind in population.iter() {
            if hall_of_fame
                .as_ref()
                .map_or(true, |best| ind.fitness < best.fitness)
            {
                *hall_of_fame = Some(ind.clone());
            }
        }
    };
    evaluate(&mut population, &mut hall_of_fame);

    for generation in 1..=params.generations {
        let mut offspring: Vec<Individual> = (0..population.len())
            .map(|_| tournament(&population, params.tournament, &mut rng))
            .collect();

        for k in (1..offspring.len()).step_by(2) {
            if rng.gen::<f64>() < params.cxpb {
                let (left, right) = offspring.split_at_mut(k);
                two_point_crossover(&mut left[k - 1].genes, &mut right[0].genes, &mut rng);
                left[k - 1].fitness = None;
                right[0].fitness = None;
            }
        }
        for ind in offspring.iter_mut() {
            if rng.gen::<f64>() < params.mutpb {
                gaussian_mutation(&mut ind.genes, &normal, params.indpb, &mut rng);
                ind.fitness = None;
            }
        }

        evaluate(&mut offspring, &mut hall_of_fame);
        population = offspring;

        let fitnesses: Vec<u64> = population.iter().filter_map(|ind| ind.fitness).collect();
        debug!(
            "generation {}: min {} avg {:.2}",
            generation,
            fitnesses.iter().min().copied().unwrap_or(0),
            fitnesses.iter().sum::<u64>() as f64 / fitnesses.len().max(1) as f64
        );
    }

    Ok(hall_of_fame.map(|best| repairer.repair(&best.genes)))
}
