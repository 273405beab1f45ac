use allot_structs::{config::*, results::Family};

#[test]
fn test_config_defaults() {
    let config: BenchmarkConfig = serde_json::from_str(r#"{"family": "classroom"}"#).unwrap();
    assert_eq!(config.family, Family::Classroom);
    assert_eq!(config.sizes.first(), Some(&101));
    assert_eq!(config.sizes.last(), Some(&2001));
    assert_eq!(config.sizes.len(), 11);
    assert_eq!(config.repetitions, 10);
    assert_eq!(config.seed, 42);
    assert_eq!(config.run_mode, RunMode::InProcess);
    assert_eq!(config.reference(), None);
    assert_eq!(config, BenchmarkConfig::new(Family::Classroom));
}

#[test]
fn test_config_overrides() {
    let config: BenchmarkConfig = serde_json::from_str(
        r#"{
            "family": "transport",
            "sizes": [11, 101],
            "solvers": ["vogel", "classic"],
            "repetitions": 3,
            "generator": {"max_value": 50},
            "run_mode": {"mode": "subprocess", "runtime": "target/release/allot-runtime"},
            "hyperparameters": {"genetic": {"generations": 5}},
            "reference": "classic"
        }"#,
    )
    .unwrap();
    assert_eq!(config.sizes, vec![11, 101]);
    assert_eq!(config.repetitions, 3);
    assert_eq!(config.generator["max_value"], 50);
    assert_eq!(
        config.run_mode,
        RunMode::Subprocess {
            runtime: "target/release/allot-runtime".to_string()
        }
    );
    assert_eq!(config.reference().map(String::as_str), Some("classic"));
    assert_eq!(config.hyperparameters_for("genetic").unwrap()["generations"], 5);
    assert!(config.hyperparameters_for("vogel").is_none());
}
