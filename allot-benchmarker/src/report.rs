use crate::sweep::{instance_spec, results_file, solver_codes};
use allot_algorithms::{solver_kind, SolverKind};
use allot_structs::{
    config::BenchmarkConfig,
    results::{ResultsFile, RunRecord, Status},
};
use allot_utils::{mean, paired_t_test, percentage_gap, PairedTTest};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SolverSummary {
    pub code: String,
    pub runs: usize,
    pub mean_time: Option<f64>,
    /// Mean over the runs that produced a cost.
    pub mean_cost: Option<f64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SizeReport {
    pub size: usize,
    pub optimum: Option<f64>,
    pub solvers: Vec<SolverSummary>,
}

impl SizeReport {
    pub fn solver(&self, code: &str) -> Option<&SolverSummary> {
        self.solvers.iter().find(|s| s.code == code)
    }

    pub fn mean_time(&self, code: &str) -> Option<f64> {
        self.solver(code).and_then(|s| s.mean_time)
    }

    pub fn gap(&self, code: &str) -> Option<f64> {
        let cost = self.solver(code).and_then(|s| s.mean_cost)?;
        Some(percentage_gap(cost, self.optimum?))
    }
}

fn summarize_solver(code: &str, records: &[RunRecord]) -> SolverSummary {
    let times: Vec<f64> = records.iter().map(|r| r.time).collect();
    let costs: Vec<f64> = records
        .iter()
        .filter(|r| r.status.has_cost())
        .map(|r| r.cost)
        .collect();
    SolverSummary {
        code: code.to_string(),
        runs: records.len(),
        mean_time: mean(&times),
        mean_cost: mean(&costs),
    }
}

/// Lowest cost among runs of `reference`, or among optimal runs when no reference is given.
pub fn optimum(records: &[RunRecord], reference: Option<&str>) -> Option<f64> {
    records
        .iter()
        .filter(|r| r.status.has_cost())
        .filter(|r| match reference {
            Some(code) => r.code == code,
            None => r.status == Status::Optimal,
        })
        .map(|r| r.cost)
        .min_by(|a, b| a.total_cmp(b))
}

/// Aggregates the first `k` runs of each code stored in one results file.
pub fn summarize_results(
    results: &ResultsFile,
    size: usize,
    codes: &[String],
    k: usize,
    reference: Option<&str>,
) -> Result<SizeReport> {
    let records = results.read()?;
    let solvers = codes
        .iter()
        .map(|code| {
            let runs: Vec<RunRecord> = records
                .iter()
                .filter(|r| &r.code == code)
                .take(k)
                .cloned()
                .collect();
            summarize_solver(code, &runs)
        })
        .collect();
    Ok(SizeReport {
        size,
        optimum: optimum(&records, reference),
        solvers,
    })
}

pub fn build_report(config: &BenchmarkConfig) -> Result<Vec<SizeReport>> {
    let codes = solver_codes(config);
    config
        .sizes
        .iter()
        .map(|&size| {
            let results = results_file(config, &instance_spec(config, size))?;
            summarize_results(
                &results,
                size,
                &codes,
                config.repetitions,
                config.reference.as_deref(),
            )
        })
        .collect()
}

pub fn heuristic_codes(config: &BenchmarkConfig) -> Vec<String> {
    solver_codes(config)
        .into_iter()
        .filter(|code| matches!(solver_kind(config.family, code), Ok(SolverKind::Heuristic)))
        .collect()
}

fn escape_latex(s: &str) -> String {
    s.replace('\\', "\\textbackslash{}")
        .replace('_', "\\_")
        .replace('%', "\\%")
        .replace('&', "\\&")
}

fn latex_table<F>(reports: &[SizeReport], codes: &[String], caption: &str, cell: F) -> String
where
    F: Fn(&SizeReport, &str) -> Option<String>,
{
    let mut out = String::new();
    let _ = writeln!(out, "\\begin{{table}}[ht]");
    let _ = writeln!(out, "\\centering");
    let _ = writeln!(out, "\\begin{{tabular}}{{l{}}}", "r".repeat(codes.len()));
    let _ = writeln!(out, "\\toprule");
    let header: Vec<String> = codes.iter().map(|c| escape_latex(c)).collect();
    let _ = writeln!(out, "Size & {} \\\\", header.join(" & "));
    let _ = writeln!(out, "\\midrule");
    for report in reports {
        let cells: Vec<String> = codes
            .iter()
            .map(|code| cell(report, code.as_str()).unwrap_or_else(|| "--".to_string()))
            .collect();
        let _ = writeln!(out, "{} & {} \\\\", report.size, cells.join(" & "));
    }
    let _ = writeln!(out, "\\bottomrule");
    let _ = writeln!(out, "\\end{{tabular}}");
    let _ = writeln!(out, "\\caption{{{}}}", escape_latex(caption));
    let _ = writeln!(out, "\\end{{table}}");
    out
}

/// Mean solve time in seconds per size and solver.
pub fn time_table(reports: &[SizeReport], codes: &[String]) -> String {
    latex_table(reports, codes, "Mean solve time (s)", |report, code| {
        report.mean_time(code).map(|t| format!("{:.6}", t))
    })
}

/// Mean percentage gap to the optimum per size and solver.
pub fn gap_table(reports: &[SizeReport], codes: &[String]) -> String {
    latex_table(reports, codes, "Mean gap to optimum (%)", |report, code| {
        report.gap(code).map(|g| format!("{:.2}", g))
    })
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TimeComparison {
    pub size: usize,
    pub a: String,
    pub b: String,
    pub alpha: f64,
    pub significant: bool,
    pub test: PairedTTest,
}

fn times(records: Vec<RunRecord>, k: usize) -> Vec<f64> {
    records.into_iter().take(k).map(|r| r.time).collect()
}

/// Paired t-test on the first `repetitions` times of two solvers at one size.
pub fn compare_times(
    config: &BenchmarkConfig,
    size: usize,
    a: &str,
    b: &str,
    alpha: f64,
) -> Result<TimeComparison> {
    let results = results_file(config, &instance_spec(config, size))?;
    let times_a = times(results.records_for(a)?, config.repetitions);
    let times_b = times(results.records_for(b)?, config.repetitions);
    if times_a.len() != times_b.len() {
        return Err(anyhow!(
            "Size {}: {} has {} runs but {} has {}",
            size,
            a,
            times_a.len(),
            b,
            times_b.len()
        ));
    }
    let test = paired_t_test(&times_a, &times_b)?;
    Ok(TimeComparison {
        size,
        a: a.to_string(),
        b: b.to_string(),
        alpha,
        significant: test.is_significant(alpha),
        test,
    })
}
