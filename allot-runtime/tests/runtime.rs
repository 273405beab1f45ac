use allot_challenges::classroom;
use allot_runtime::*;
use allot_structs::results::{Family, Status};
use serde_json::{json, Value};
use std::fs;

fn temp_folder(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("allot_runtime_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[test]
fn test_parse_size() {
    assert_eq!(parse_size("101").unwrap(), (101, 101));
    assert_eq!(parse_size("11x21").unwrap(), (11, 21));
    assert!(parse_size("11x").is_err());
    assert!(parse_size("abc").is_err());
}

#[test]
fn test_instance_spec_names() {
    let mut spec = InstanceSpec::new(Family::Transport, (11, 11), 42);
    assert_eq!(spec.instance_name().unwrap(), "11x11_[1,100]_seed42");
    spec.generator.insert("max_value".to_string(), json!(50));
    assert_eq!(
        spec.path("instances").unwrap(),
        std::path::Path::new("instances/transport_11x11_[1,50]_seed42.csv")
    );

    let spec = InstanceSpec::new(Family::Classroom, (5, 7), 3);
    assert_eq!(
        spec.instance_name().unwrap(),
        "D5_S7_[10,90]_[30,90]_[1,10]_seed3"
    );
    let mut bad = spec.clone();
    bad.generator.insert("min_students".to_string(), json!("ten"));
    assert!(bad.instance_name().is_err());
}

#[test]
fn test_load_or_generate() {
    let dir = temp_folder("load");
    let spec = InstanceSpec::new(Family::Classroom, (6, 6), 42);
    assert!(spec.load(&dir).is_err());
    let generated = spec.load_or_generate(&dir).unwrap();
    assert!(spec.path(&dir).unwrap().exists());
    assert_eq!(spec.load(&dir).unwrap(), generated);
    assert_eq!(generated.family(), Family::Classroom);
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_compute_solution_statuses() {
    let spec = InstanceSpec::new(Family::Transport, (8, 9), 42);
    let instance = spec.generate().unwrap();
    let name = spec.instance_name().unwrap();
    let options = RunOptions::default();

    let heuristic = compute_solution(&instance, &name, "vogel", &options).unwrap();
    assert_eq!(heuristic.record.status, Status::Approximate);
    assert_eq!(heuristic.record.code, "vogel");
    assert!(heuristic.record.time >= 0.0);
    assert!(heuristic.solution.is_some());

    let exact = compute_solution(&instance, &name, "classic", &options).unwrap();
    assert_eq!(exact.record.status, Status::Optimal);
    assert!(exact.record.cost <= heuristic.record.cost);

    assert!(compute_solution(&instance, &name, "hungarian", &options).is_err());
}

#[test]
fn test_compute_solution_without_solution() {
    let instance = Instance::Classroom(
        classroom::Challenge::new(
            vec!["D1".into(), "D2".into()],
            vec!["S1".into(), "S2".into()],
            vec![40, 45],
            vec![50, 30],
            vec![vec![1, 1], vec![1, 1]],
        )
        .unwrap(),
    );
    let options = RunOptions::default();
    let greedy = compute_solution(&instance, "tiny", "greedy", &options).unwrap();
    assert_eq!(greedy.record.status, Status::Failure);
    assert_eq!(greedy.record.cost, -1.0);
    let exact = compute_solution(&instance, "tiny", "exact", &options).unwrap();
    assert_eq!(exact.record.status, Status::Infeasible);
    assert!(exact.error.is_none());
}

#[test]
fn test_shared_rooms_run_is_checked_against_shared_capacity() {
    let instance = Instance::Classroom(
        classroom::Challenge::new(
            vec!["D1".into(), "D2".into()],
            vec!["S1".into(), "S2".into()],
            vec![10, 10],
            vec![30, 30],
            vec![vec![1, 2], vec![1, 9]],
        )
        .unwrap(),
    );
    let options = RunOptions {
        hyperparameters: json!({"shared_rooms": true}).as_object().cloned(),
        ..RunOptions::default()
    };
    let outcome = compute_solution(&instance, "tiny", "greedy", &options).unwrap();
    assert_eq!(outcome.record.status, Status::Approximate);
    assert_eq!(outcome.record.cost, 20.0);
}

#[test]
fn test_ampl_failure_is_recorded() {
    let dir = temp_folder("ampl");
    let spec = InstanceSpec::new(Family::Transport, (2, 2), 1);
    let instance = spec.generate().unwrap();
    let options = RunOptions {
        hyperparameters: None,
        ampl_executable: "allot-no-such-ampl-binary".to_string(),
        ampl_folder: dir.clone(),
    };
    let outcome = compute_solution(&instance, "2x2", "ampl_highs", &options).unwrap();
    assert_eq!(outcome.record.status, Status::Failure);
    assert_eq!(outcome.record.code, "ampl_highs");
    assert!(outcome.error.is_some());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_record_and_verify() {
    let dir = temp_folder("record");
    let spec = InstanceSpec::new(Family::Transport, (3, 4), 42);
    let instance = spec.generate().unwrap();
    let name = spec.instance_name().unwrap();
    let outcome = compute_solution(&instance, &name, "greedy", &RunOptions::default()).unwrap();
    let results = record_run(dir.to_str().unwrap(), Family::Transport, &name, &outcome.record)
        .unwrap();
    assert_eq!(results.count("greedy").unwrap(), 1);

    let solution: Value = outcome.solution.unwrap();
    let cost = verify_solution(&instance, &solution.to_string()).unwrap();
    assert_eq!(cost as f64, outcome.record.cost);

    let empty = json!({"allocation": [[0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]});
    if let Instance::Transport(c) = &instance {
        assert_eq!(verify_solution(&instance, &empty.to_string()).is_ok(), c.total_demand() == 0);
    }
    assert!(verify_solution(&instance, "not json").is_err());
    fs::remove_dir_all(&dir).unwrap();
}
