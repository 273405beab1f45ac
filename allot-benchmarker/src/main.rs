use allot_benchmarker::{plot, report, sweep};
use allot_structs::config::BenchmarkConfig;
use allot_utils::{jsonify_pretty, load_json_arg};
use anyhow::{anyhow, Result};
use clap::{arg, ArgMatches, Command};
use std::{fs, path::PathBuf};

fn config_arg() -> clap::Arg {
    arg!(<CONFIG> "Benchmark config json string or path to json file")
        .value_parser(clap::value_parser!(String))
}

fn cli() -> Command {
    Command::new("allot-benchmarker")
        .about("Sweeps solvers over instance sizes and reports on the results")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("sweep")
                .about("Runs every solver until each size has the configured repetitions")
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("replay")
                .about("Samples stored runs, topping up missing repetitions")
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("table")
                .about("Prints LaTeX tables of mean time and mean gap")
                .arg(config_arg())
                .arg(
                    arg!(--output [OUTPUT_FILE] "If set, the tables are saved to this path")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("plot")
                .about("Plots mean time and mean gap against size")
                .arg(config_arg())
                .arg(
                    arg!(--folder [FOLDER] "Folder for the svg files")
                        .default_value("plots")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("ttest")
                .about("Paired t-test on the solve times of two solvers")
                .arg(config_arg())
                .arg(arg!(<SIZE> "Instance size").value_parser(clap::value_parser!(usize)))
                .arg(
                    arg!(<SOLVER_A> "First solver code")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(<SOLVER_B> "Second solver code")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--alpha [ALPHA] "Significance level, defaults to the config's alpha")
                        .value_parser(clap::value_parser!(f64)),
                ),
        )
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("sweep", sub_m)) => run_sweep(sub_m),
        Some(("replay", sub_m)) => run_replay(sub_m),
        Some(("table", sub_m)) => table(sub_m),
        Some(("plot", sub_m)) => plots(sub_m),
        Some(("ttest", sub_m)) => ttest(sub_m),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(sub_m: &ArgMatches) -> Result<BenchmarkConfig> {
    load_json_arg(
        sub_m
            .get_one::<String>("CONFIG")
            .ok_or_else(|| anyhow!("Missing CONFIG"))?,
    )
}

fn run_sweep(sub_m: &ArgMatches) -> Result<()> {
    let config = load_config(sub_m)?;
    let summary = sweep::sweep(&config)?;
    println!("{}", jsonify_pretty(&summary));
    Ok(())
}

fn run_replay(sub_m: &ArgMatches) -> Result<()> {
    let config = load_config(sub_m)?;
    let points = sweep::replay(&config)?;
    println!("{}", jsonify_pretty(&points));
    Ok(())
}

fn table(sub_m: &ArgMatches) -> Result<()> {
    let config = load_config(sub_m)?;
    let reports = report::build_report(&config)?;
    let tables = format!(
        "{}\n{}",
        report::time_table(&reports, &sweep::solver_codes(&config)),
        report::gap_table(&reports, &report::heuristic_codes(&config))
    );
    match sub_m.get_one::<PathBuf>("output") {
        Some(path) => fs::write(path, tables)
            .map_err(|e| anyhow!("Failed to write tables to {}: {}", path.display(), e))?,
        None => print!("{}", tables),
    }
    Ok(())
}

fn plots(sub_m: &ArgMatches) -> Result<()> {
    let config = load_config(sub_m)?;
    let folder = sub_m
        .get_one::<PathBuf>("folder")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("plots"));
    fs::create_dir_all(&folder)
        .map_err(|e| anyhow!("Failed to create {}: {}", folder.display(), e))?;
    let reports = report::build_report(&config)?;

    let times = folder.join(format!("{}_time.svg", config.family));
    plot::plot_times(&reports, &sweep::solver_codes(&config), &times)?;
    println!("{}", times.display());

    let gaps = folder.join(format!("{}_gap.svg", config.family));
    plot::plot_gaps(&reports, &report::heuristic_codes(&config), &gaps)?;
    println!("{}", gaps.display());
    Ok(())
}

fn ttest(sub_m: &ArgMatches) -> Result<()> {
    let config = load_config(sub_m)?;
    let get = |id: &str| {
        sub_m
            .get_one::<String>(id)
            .ok_or_else(|| anyhow!("Missing {}", id))
    };
    let size = *sub_m
        .get_one::<usize>("SIZE")
        .ok_or_else(|| anyhow!("Missing SIZE"))?;
    let alpha = sub_m.get_one::<f64>("alpha").copied().unwrap_or(config.alpha);
    let comparison =
        report::compare_times(&config, size, get("SOLVER_A")?, get("SOLVER_B")?, alpha)?;

    println!(
        "t = {:.6}, p = {:.6}, df = {}",
        comparison.test.statistic, comparison.test.p_value, comparison.test.degrees_of_freedom
    );
    if comparison.significant {
        println!(
            "{} and {} differ significantly at alpha = {}",
            comparison.a, comparison.b, alpha
        );
    } else {
        println!(
            "No significant difference between {} and {} at alpha = {}",
            comparison.a, comparison.b, alpha
        );
    }
    Ok(())
}
