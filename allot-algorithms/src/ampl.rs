use allot_challenges::{ampl, AmplInstance};
use allot_structs::results::Status;
use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, process::Command};

pub const CODE_PREFIX: &str = "ampl_";

/// `ampl_highs` -> `highs`.
pub fn solver_from_code(code: &str) -> Option<&str> {
    code.strip_prefix(CODE_PREFIX).filter(|s| !s.is_empty())
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AmplOptions {
    pub executable: String,
    pub solver: String,
    /// Where models, data and run scripts are written.
    pub folder: PathBuf,
}

impl AmplOptions {
    pub fn new(solver: &str) -> Self {
        Self {
            executable: "ampl".to_string(),
            solver: solver.to_string(),
            folder: PathBuf::from("ampl"),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AmplOutcome {
    pub status: Status,
    pub solve_result: String,
    pub objective: Option<f64>,
}

pub fn status_from_solve_result(solve_result: &str) -> Status {
    match solve_result {
        "solved" => Status::Optimal,
        "solved?" | "limit" => Status::Approximate,
        "infeasible" => Status::Infeasible,
        _ => Status::Failure,
    }
}

/// Reads `name = value` lines printed by `display`.
pub fn parse_output(stdout: &str, objective: &str) -> Result<AmplOutcome> {
    let mut solve_result = None;
    let mut value = None;
    for line in stdout.lines() {
        if let Some((name, rest)) = line.split_once('=') {
            let rest = rest.trim().trim_end_matches(';').trim();
            match name.trim() {
                "solve_result" => solve_result = Some(rest.trim_matches('\'').to_string()),
                n if n == objective => {
                    value = Some(rest.parse::<f64>().map_err(|e| {
                        anyhow!("Invalid {} value '{}': {}", objective, rest, e)
                    })?)
                }
                _ => {}
            }
        }
    }
    let solve_result =
        solve_result.ok_or_else(|| anyhow!("AMPL output did not contain solve_result"))?;
    Ok(AmplOutcome {
        status: status_from_solve_result(&solve_result),
        solve_result,
        objective: value,
    })
}

pub fn solve<T: AmplInstance>(
    instance: &T,
    instance_name: &str,
    options: &AmplOptions,
) -> Result<AmplOutcome> {
    let model_path = options.folder.join(format!("{}.mod", T::FILE_STEM));
    let data_path = options
        .folder
        .join(format!("{}_{}.dat", T::FILE_STEM, instance_name));
    let run_path = options.folder.join(format!(
        "{}_{}_{}.run",
        T::FILE_STEM,
        instance_name,
        options.solver
    ));
    ampl::write_model::<T, _>(&model_path)?;
    ampl::write_data(instance, &data_path)?;
    fs::write(
        &run_path,
        format!(
            "model \"{}\";\ndata \"{}\";\noption solver {};\nsolve;\ndisplay solve_result, {};\n",
            model_path.display(),
            data_path.display(),
            options.solver,
            T::OBJECTIVE
        ),
    )
    .with_context(|| format!("Failed to write AMPL script {}", run_path.display()))?;

    info!("Running {} {}", options.executable, run_path.display());
    let output = Command::new(&options.executable)
        .arg(&run_path)
        .output()
        .with_context(|| format!("Failed to run '{}'", options.executable))?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    debug!("AMPL output:\n{}", stdout);
    if !output.status.success() {
        return Err(anyhow!(
            "AMPL exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }
    parse_output(&stdout, T::OBJECTIVE)
}
