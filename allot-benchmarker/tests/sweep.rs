use allot_benchmarker::sweep::*;
use allot_structs::{
    config::{BenchmarkConfig, RunMode},
    results::Family,
};
use serde_json::json;
use std::{fs, path::PathBuf, process::Command};

fn temp_folder(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "allot_benchmarker_{}_{}",
        name,
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn config(folder: &std::path::Path, solvers: &[&str]) -> BenchmarkConfig {
    let mut config = BenchmarkConfig::new(Family::Transport);
    config.sizes = vec![4, 5];
    config.solvers = solvers.iter().map(|s| s.to_string()).collect();
    config.repetitions = 2;
    config.instances_folder = folder.join("instances").to_string_lossy().to_string();
    config.solutions_folder = folder.join("solutions").to_string_lossy().to_string();
    config
}

#[test]
fn test_default_solver_codes() {
    let config = BenchmarkConfig::new(Family::Classroom);
    assert_eq!(solver_codes(&config), vec!["greedy", "hungarian", "exact"]);
    let mut config = BenchmarkConfig::new(Family::Transport);
    config.solvers = vec!["vogel".to_string()];
    assert_eq!(solver_codes(&config), vec!["vogel"]);
}

#[test]
fn test_sweep_fills_and_then_skips() {
    let folder = temp_folder("sweep");
    let config = config(&folder, &["northwest_corner", "vogel"]);

    let summary = sweep(&config).unwrap();
    assert_eq!(
        summary,
        SweepSummary {
            executed: 8,
            failed: 0,
            skipped_sizes: 0
        }
    );
    for &size in &config.sizes {
        let spec = instance_spec(&config, size);
        assert!(spec.path(&config.instances_folder).unwrap().exists());
        let results = results_file(&config, &spec).unwrap();
        assert_eq!(results.count("northwest_corner").unwrap(), 2);
        assert_eq!(results.count("vogel").unwrap(), 2);
    }

    let again = sweep(&config).unwrap();
    assert_eq!(again.executed, 0);
    assert_eq!(again.skipped_sizes, 2);
}

#[test]
fn test_sweep_continues_after_failures() {
    let folder = temp_folder("sweep_failures");
    let mut config = config(&folder, &["vogel", "hungarian"]);
    config.sizes = vec![4];
    config.repetitions = 1;

    let summary = sweep(&config).unwrap();
    assert_eq!(summary.executed, 1);
    assert_eq!(summary.failed, 1);
    let results = results_file(&config, &instance_spec(&config, 4)).unwrap();
    assert_eq!(results.count("vogel").unwrap(), 1);
    assert_eq!(results.count("hungarian").unwrap(), 0);
}

#[test]
fn test_subprocess_spawn_failures_are_counted() {
    let folder = temp_folder("sweep_subprocess");
    let mut config = config(&folder, &["vogel"]);
    config.sizes = vec![4];
    config.run_mode = RunMode::Subprocess {
        runtime: folder.join("missing-runtime").to_string_lossy().to_string(),
    };

    let summary = sweep(&config).unwrap();
    assert_eq!(summary.executed, 0);
    assert_eq!(summary.failed, 2);
}

/// The `allot-runtime` binary next to this test's target directory, built on demand.
fn runtime_binary() -> PathBuf {
    let exe = std::env::current_exe().unwrap();
    let profile_dir = exe.parent().unwrap().parent().unwrap().to_path_buf();
    let binary = profile_dir.join(format!("allot-runtime{}", std::env::consts::EXE_SUFFIX));
    if !binary.exists() {
        let profile = match profile_dir.file_name().and_then(|f| f.to_str()) {
            Some("debug") | None => "dev".to_string(),
            Some(other) => other.to_string(),
        };
        let status = Command::new(env!("CARGO"))
            .arg("build")
            .arg("--manifest-path")
            .arg(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../Cargo.toml"))
            .args(["-p", "allot-runtime", "--bin", "allot-runtime", "--profile", &profile])
            .arg("--target-dir")
            .arg(profile_dir.parent().unwrap())
            .status()
            .unwrap();
        assert!(status.success());
    }
    binary
}

#[test]
fn test_generator_flags_keep_runtime_flags_only() {
    let generator = json!({"max_value": 50, "note": 1, "min_value": "3"});
    let flags = generator_flags(generator.as_object().unwrap());
    assert_eq!(
        flags,
        vec![("min_value", "3".to_string()), ("max_value", "50".to_string())]
    );
}

#[test]
fn test_subprocess_sweep_records_runs() {
    let folder = temp_folder("sweep_runtime");
    let mut config = config(&folder, &["vogel", "greedy"]);
    config.sizes = vec![4];
    config.generator = json!({"max_value": 50, "note": 1})
        .as_object()
        .unwrap()
        .clone();
    config.run_mode = RunMode::Subprocess {
        runtime: runtime_binary().to_string_lossy().to_string(),
    };

    let summary = sweep(&config).unwrap();
    assert_eq!(summary.executed, 4);
    assert_eq!(summary.failed, 0);
    let spec = instance_spec(&config, 4);
    assert_eq!(spec.instance_name().unwrap(), "4x4_[1,50]_seed42");
    let results = results_file(&config, &spec).unwrap();
    assert_eq!(results.count("vogel").unwrap(), 2);
    assert_eq!(results.count("greedy").unwrap(), 2);

    config.run_mode = RunMode::InProcess;
    let again = sweep(&config).unwrap();
    assert_eq!(again.skipped_sizes, 1);
}

#[test]
fn test_replay_tops_up_missing_runs() {
    let folder = temp_folder("replay");
    let mut config = config(&folder, &["greedy", "classic"]);
    config.sizes = vec![5];

    let points = replay(&config).unwrap();
    assert_eq!(points.len(), 2);
    for point in &points {
        assert_eq!(point.size, 5);
        assert_eq!(point.runs, 2);
        assert!(point.mean_time.is_some());
        assert!(point.mean_cost.is_some());
    }
    let greedy = points.iter().find(|p| p.code == "greedy").unwrap();
    let classic = points.iter().find(|p| p.code == "classic").unwrap();
    assert!(classic.mean_cost.unwrap() <= greedy.mean_cost.unwrap());

    config.repetitions = 3;
    let points = replay(&config).unwrap();
    assert!(points.iter().all(|p| p.runs == 3));
    let results = results_file(&config, &instance_spec(&config, 5)).unwrap();
    assert_eq!(results.count("greedy").unwrap(), 3);

    config.repetitions = 1;
    let points = replay(&config).unwrap();
    assert!(points.iter().all(|p| p.runs == 1));
    assert_eq!(results.count("classic").unwrap(), 3);
}
