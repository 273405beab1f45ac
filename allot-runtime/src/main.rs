use allot_algorithms::solvers;
use allot_runtime::*;
use allot_structs::results::Family;
use allot_utils::{jsonify_pretty, load_hyperparameters, read_json_arg};
use anyhow::{anyhow, Result};
use clap::{arg, ArgAction, ArgMatches, Command};
use serde_json::{Map, Value};
use std::{fs, path::PathBuf};

fn instance_args(cmd: Command) -> Command {
    cmd.arg(
        arg!(<SIZE> "Instance size, N for square instances or NxM")
            .value_parser(clap::value_parser!(String)),
    )
    .arg(
        arg!(--min_students [MIN_STUDENTS] "Classroom: minimum enrolment")
            .value_parser(clap::value_parser!(u32)),
    )
    .arg(
        arg!(--max_students [MAX_STUDENTS] "Classroom: maximum enrolment")
            .value_parser(clap::value_parser!(u32)),
    )
    .arg(
        arg!(--min_capacity [MIN_CAPACITY] "Classroom: minimum room capacity")
            .value_parser(clap::value_parser!(u32)),
    )
    .arg(
        arg!(--max_capacity [MAX_CAPACITY] "Classroom: maximum room capacity")
            .value_parser(clap::value_parser!(u32)),
    )
    .arg(
        arg!(--min_distance [MIN_DISTANCE] "Classroom: minimum distance")
            .value_parser(clap::value_parser!(u32)),
    )
    .arg(
        arg!(--max_distance [MAX_DISTANCE] "Classroom: distance upper bound (exclusive)")
            .value_parser(clap::value_parser!(u32)),
    )
    .arg(
        arg!(--min_value [MIN_VALUE] "Transport: minimum cost and supply")
            .value_parser(clap::value_parser!(u32)),
    )
    .arg(
        arg!(--max_value [MAX_VALUE] "Transport: maximum cost and supply")
            .value_parser(clap::value_parser!(u32)),
    )
    .arg(
        arg!(--seed [SEED] "Seed used to generate the instance")
            .default_value("42")
            .value_parser(clap::value_parser!(u64)),
    )
    .arg(
        arg!(--folder [FOLDER] "Folder holding instance files")
            .default_value("instances")
            .value_parser(clap::value_parser!(String)),
    )
}

/// Registered solver codes per family, shown under `compute_solution --help`.
fn solver_listing() -> String {
    let mut listing = String::from("Solvers:");
    for family in [Family::Classroom, Family::Transport] {
        listing.push_str(&format!("\n  {}:", family));
        for solver in solvers(family) {
            listing.push_str(&format!("\n    {:<18}{}", solver.id, solver.description));
        }
    }
    listing.push_str("\n  ampl_<solver> runs the AMPL model with the named solver");
    listing
}

fn family_arg() -> clap::Arg {
    arg!(<FAMILY> "Problem family").value_parser(["classroom", "transport"])
}

fn cli() -> Command {
    Command::new("allot-runtime")
        .about("Generates instances, computes or verifies solutions")
        .arg_required_else_help(true)
        .subcommand(instance_args(
            Command::new("generate")
                .about("Generates an instance csv")
                .arg(family_arg()),
        ))
        .subcommand(
            instance_args(
                Command::new("compute_solution")
                    .about("Solves an instance once and records the run")
                    .after_help(solver_listing())
                    .arg(family_arg())
                    .arg(
                        arg!(<SOLVER> "Solver code, e.g. greedy, vogel or ampl_highs")
                            .value_parser(clap::value_parser!(String)),
                    ),
            )
            .arg(
                arg!(--hyperparameters [HYPERPARAMETERS] "Hyperparameters json string or path")
                    .value_parser(clap::value_parser!(String)),
            )
            .arg(
                arg!(--output [OUTPUT_FILE] "If set, the solution json is saved to this path")
                    .value_parser(clap::value_parser!(PathBuf)),
            )
            .arg(
                arg!(--generate "Generate the instance if its file is missing")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                arg!(--solutions [SOLUTIONS] "Folder holding results csv files")
                    .default_value("solutions")
                    .value_parser(clap::value_parser!(String)),
            )
            .arg(
                arg!(--ampl [AMPL] "AMPL executable used by ampl_* solvers")
                    .default_value("ampl")
                    .value_parser(clap::value_parser!(String)),
            )
            .arg(
                arg!(--ampl_folder [AMPL_FOLDER] "Folder for AMPL models and data")
                    .default_value("ampl")
                    .value_parser(clap::value_parser!(PathBuf)),
            ),
        )
        .subcommand(
            instance_args(
                Command::new("verify_solution")
                    .about("Verifies a solution")
                    .arg(family_arg())
                    .arg(
                        arg!(<SOLUTION> "Solution json string, path to json file, or '-' for stdin")
                            .value_parser(clap::value_parser!(String)),
                    ),
            ),
        )
}

fn instance_spec(sub_m: &ArgMatches) -> Result<InstanceSpec> {
    let family = sub_m
        .get_one::<String>("FAMILY")
        .ok_or_else(|| anyhow!("Missing FAMILY"))?
        .parse::<Family>()?;
    let size = parse_size(
        sub_m
            .get_one::<String>("SIZE")
            .ok_or_else(|| anyhow!("Missing SIZE"))?,
    )?;
    let mut generator = Map::new();
    for flag in GENERATOR_FLAGS {
        if let Some(v) = sub_m.get_one::<u32>(flag) {
            generator.insert(flag.to_string(), Value::from(*v));
        }
    }
    Ok(InstanceSpec {
        family,
        size,
        generator,
        seed: *sub_m.get_one::<u64>("seed").unwrap_or(&42),
    })
}

fn folder(sub_m: &ArgMatches, id: &str) -> String {
    sub_m.get_one::<String>(id).cloned().unwrap_or_default()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("generate", sub_m)) => generate(sub_m),
        Some(("compute_solution", sub_m)) => compute(sub_m),
        Some(("verify_solution", sub_m)) => verify(sub_m),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn generate(sub_m: &ArgMatches) -> Result<()> {
    let spec = instance_spec(sub_m)?;
    let (_, path) = spec.generate_to(folder(sub_m, "folder"))?;
    println!("{}", path.display());
    Ok(())
}

fn compute(sub_m: &ArgMatches) -> Result<()> {
    let spec = instance_spec(sub_m)?;
    let instances = folder(sub_m, "folder");
    let instance = if *sub_m.get_one::<bool>("generate").unwrap_or(&false) {
        spec.load_or_generate(&instances)?
    } else {
        spec.load(&instances)?
    };
    let instance_name = spec.instance_name()?;
    let code = sub_m
        .get_one::<String>("SOLVER")
        .ok_or_else(|| anyhow!("Missing SOLVER"))?;
    let options = RunOptions {
        hyperparameters: load_hyperparameters(
            sub_m.get_one::<String>("hyperparameters").map(String::as_str),
        )?,
        ampl_executable: folder(sub_m, "ampl"),
        ampl_folder: sub_m
            .get_one::<PathBuf>("ampl_folder")
            .cloned()
            .unwrap_or_else(|| PathBuf::from("ampl")),
    };

    let outcome = compute_solution(&instance, &instance_name, code, &options)?;
    let results = record_run(
        &folder(sub_m, "solutions"),
        spec.family,
        &instance_name,
        &outcome.record,
    )?;

    println!("Status: {}", outcome.record.status);
    if outcome.record.status.has_cost() {
        println!("Cost: {}", outcome.record.cost);
    } else {
        println!("Cost: N/A");
    }
    println!("Time: {:.6} s", outcome.record.time);
    println!("Results: {}", results.path().display());

    if let (Some(path), Some(solution)) = (sub_m.get_one::<PathBuf>("output"), &outcome.solution) {
        fs::write(path, jsonify_pretty(solution))
            .map_err(|e| anyhow!("Failed to write solution to {}: {}", path.display(), e))?;
    }
    match outcome.error {
        Some(e) => Err(anyhow!("{} failed: {}", code, e)),
        None => Ok(()),
    }
}

fn verify(sub_m: &ArgMatches) -> Result<()> {
    let spec = instance_spec(sub_m)?;
    let instance = spec.load(folder(sub_m, "folder"))?;
    let solution = read_json_arg(
        sub_m
            .get_one::<String>("SOLUTION")
            .ok_or_else(|| anyhow!("Missing SOLUTION"))?,
    )?;
    let cost = verify_solution(&instance, &solution)?;
    println!("Solution is valid (cost {})", cost);
    Ok(())
}
