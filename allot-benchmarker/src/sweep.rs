use allot_algorithms::solvers;
use allot_runtime::{
    compute_solution, record_run, Instance, InstanceSpec, RunOptions, GENERATOR_FLAGS,
};
use allot_structs::{
    config::{BenchmarkConfig, RunMode},
    results::{ResultsFile, RunRecord},
};
use allot_utils::{jsonify, mean};
use anyhow::{anyhow, Context, Result};
use log::{error, info};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::process::Command;

/// Configured solver codes, or every registered solver of the family.
pub fn solver_codes(config: &BenchmarkConfig) -> Vec<String> {
    if config.solvers.is_empty() {
        solvers(config.family)
            .iter()
            .map(|s| s.id.to_string())
            .collect()
    } else {
        config.solvers.clone()
    }
}

pub fn instance_spec(config: &BenchmarkConfig, size: usize) -> InstanceSpec {
    InstanceSpec {
        family: config.family,
        size: (size, size),
        generator: config.generator.clone(),
        seed: config.seed,
    }
}

pub fn results_file(config: &BenchmarkConfig, spec: &InstanceSpec) -> Result<ResultsFile> {
    Ok(ResultsFile::new(
        &config.solutions_folder,
        config.family,
        &spec.instance_name()?,
    ))
}

fn shuffle_rng(config: &BenchmarkConfig) -> StdRng {
    StdRng::seed_from_u64(config.shuffle_seed.unwrap_or(config.seed))
}

fn run_options(config: &BenchmarkConfig, code: &str) -> RunOptions {
    RunOptions {
        hyperparameters: config.hyperparameters_for(code),
        ampl_executable: config.ampl.clone().unwrap_or_else(|| "ampl".to_string()),
        ..RunOptions::default()
    }
}

/// Generator entries the runtime accepts as flags, rendered as flag values.
/// Other keys are skipped.
pub fn generator_flags(generator: &Map<String, Value>) -> Vec<(&'static str, String)> {
    GENERATOR_FLAGS
        .iter()
        .filter_map(|&flag| {
            let value = match generator.get(flag)? {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((flag, value))
        })
        .collect()
}

fn run_subprocess(
    runtime: &str,
    config: &BenchmarkConfig,
    spec: &InstanceSpec,
    code: &str,
) -> Result<()> {
    let mut cmd = Command::new(runtime);
    cmd.arg("compute_solution")
        .arg(spec.family.as_str())
        .arg(code)
        .arg(format!("{}x{}", spec.size.0, spec.size.1))
        .arg("--seed")
        .arg(spec.seed.to_string())
        .arg("--folder")
        .arg(&config.instances_folder)
        .arg("--solutions")
        .arg(&config.solutions_folder)
        .arg("--generate");
    for (key, value) in generator_flags(&spec.generator) {
        cmd.arg(format!("--{}", key)).arg(value);
    }
    if let Some(hyperparameters) = config.hyperparameters_for(code) {
        cmd.arg("--hyperparameters").arg(jsonify(&hyperparameters));
    }
    if let Some(ampl) = &config.ampl {
        cmd.arg("--ampl").arg(ampl);
    }
    let output = cmd
        .output()
        .with_context(|| format!("Failed to run {}", runtime))?;
    if output.status.success() {
        Ok(())
    } else {
        Err(anyhow!(
            "{} exited with {}: {}",
            runtime,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ))
    }
}

/// Runs one repetition of `code` and records it.
pub fn run_once(
    config: &BenchmarkConfig,
    spec: &InstanceSpec,
    instance: &Instance,
    code: &str,
) -> Result<()> {
    match &config.run_mode {
        RunMode::InProcess => {
            let name = spec.instance_name()?;
            let outcome = compute_solution(instance, &name, code, &run_options(config, code))?;
            record_run(&config.solutions_folder, config.family, &name, &outcome.record)?;
            match outcome.error {
                Some(e) => Err(anyhow!(e)),
                None => Ok(()),
            }
        }
        RunMode::Subprocess { runtime } => run_subprocess(runtime, config, spec, code),
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SweepSummary {
    pub executed: usize,
    pub failed: usize,
    pub skipped_sizes: usize,
}

/// Brings every (size, solver) pair up to `repetitions` recorded runs.
pub fn sweep(config: &BenchmarkConfig) -> Result<SweepSummary> {
    let codes = solver_codes(config);
    let mut rng = shuffle_rng(config);
    let mut summary = SweepSummary::default();

    for &size in &config.sizes {
        let spec = instance_spec(config, size);
        let results = results_file(config, &spec)?;

        let mut queue: Vec<String> = Vec::new();
        for code in &codes {
            let done = results.count(code)?;
            let missing = config.repetitions.saturating_sub(done);
            queue.extend(std::iter::repeat(code.clone()).take(missing));
        }
        if queue.is_empty() {
            info!("Size {}: every solver has {} runs, skipping", size, config.repetitions);
            summary.skipped_sizes += 1;
            continue;
        }

        let instance = match spec.load_or_generate(&config.instances_folder) {
            Ok(instance) => instance,
            Err(e) => {
                error!("Size {}: failed to prepare instance: {}", size, e);
                summary.failed += queue.len();
                continue;
            }
        };

        queue.shuffle(&mut rng);
        info!("Size {}: {} runs queued", size, queue.len());
        for (k, code) in queue.iter().enumerate() {
            info!("Size {} [{}/{}]: {}", size, k + 1, queue.len(), code);
            match run_once(config, &spec, &instance, code) {
                Ok(()) => summary.executed += 1,
                Err(e) => {
                    error!("Size {}: {} failed: {}", size, code, e);
                    summary.failed += 1;
                }
            }
        }
    }
    Ok(summary)
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ReplayPoint {
    pub size: usize,
    pub code: String,
    pub runs: usize,
    pub mean_time: Option<f64>,
    pub mean_cost: Option<f64>,
}

fn summarize(size: usize, code: &str, records: &[RunRecord]) -> ReplayPoint {
    let times: Vec<f64> = records.iter().map(|r| r.time).collect();
    let costs: Vec<f64> = records
        .iter()
        .filter(|r| r.status.has_cost())
        .map(|r| r.cost)
        .collect();
    ReplayPoint {
        size,
        code: code.to_string(),
        runs: records.len(),
        mean_time: mean(&times),
        mean_cost: mean(&costs),
    }
}

/// Samples up to `repetitions` stored runs per (size, solver), running the shortfall.
pub fn replay(config: &BenchmarkConfig) -> Result<Vec<ReplayPoint>> {
    let codes = solver_codes(config);
    let mut rng = shuffle_rng(config);
    let mut points = Vec::new();

    for &size in &config.sizes {
        let spec = instance_spec(config, size);
        let results = results_file(config, &spec)?;
        let mut instance: Option<Instance> = None;

        for code in &codes {
            let mut sample = results.sample(code, config.repetitions, &mut rng)?;
            let missing = config.repetitions.saturating_sub(sample.len());
            if missing > 0 {
                if instance.is_none() {
                    instance = Some(spec.load_or_generate(&config.instances_folder)?);
                }
                if let Some(instance) = &instance {
                    info!("Size {}: running {} more {} runs", size, missing, code);
                    for _ in 0..missing {
                        if let Err(e) = run_once(config, &spec, instance, code) {
                            error!("Size {}: {} failed: {}", size, code, e);
                        }
                    }
                }
                sample = results.sample(code, config.repetitions, &mut rng)?;
            }
            points.push(summarize(size, code, &sample));
        }
    }
    Ok(points)
}
