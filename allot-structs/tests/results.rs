use allot_structs::results::*;
use rand::{rngs::StdRng, SeedableRng};
use std::fs;

fn temp_folder(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("allot_structs_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[test]
fn test_results_file_path() {
    let file = ResultsFile::new("solutions", Family::Transport, "11x11_[1,100]_seed42");
    assert_eq!(
        file.path(),
        std::path::Path::new("solutions/transport_11x11_[1,100]_seed42_results.csv")
    );
}

#[test]
fn test_append_read_and_count() {
    let dir = temp_folder("append");
    let file = ResultsFile::new(&dir, Family::Classroom, "D3_S3");
    assert!(file.read().unwrap().is_empty());

    file.append(&RunRecord::new(Status::Optimal, 120.0, 0.5, "exact"))
        .unwrap();
    file.append(&RunRecord::new(Status::Approximate, 130.0, 0.01, "greedy"))
        .unwrap();
    file.append(&RunRecord::failure(0.02, "greedy")).unwrap();

    let content = fs::read_to_string(file.path()).unwrap();
    assert_eq!(content.lines().next().unwrap(), "status,cost,time,code");
    assert_eq!(content.lines().count(), 4);

    let records = file.read().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].status, Status::Optimal);
    assert_eq!(records[2].cost, -1.0);
    assert_eq!(file.count("greedy").unwrap(), 2);
    assert_eq!(file.count("hungarian").unwrap(), 0);
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_sample_without_replacement() {
    let dir = temp_folder("sample");
    let file = ResultsFile::new(&dir, Family::Transport, "2x2");
    for i in 0..5 {
        file.append(&RunRecord::new(Status::Approximate, i as f64, 0.1, "vogel"))
            .unwrap();
    }
    let mut rng = StdRng::seed_from_u64(0);
    let sample = file.sample("vogel", 3, &mut rng).unwrap();
    assert_eq!(sample.len(), 3);
    let mut costs: Vec<f64> = sample.iter().map(|r| r.cost).collect();
    costs.sort_by(|a, b| a.partial_cmp(b).unwrap());
    costs.dedup();
    assert_eq!(costs.len(), 3);

    assert_eq!(file.sample("vogel", 10, &mut rng).unwrap().len(), 5);
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_family_and_status_parsing() {
    assert_eq!("classroom".parse::<Family>().unwrap(), Family::Classroom);
    assert!("knapsack".parse::<Family>().is_err());
    assert_eq!(Status::Infeasible.to_string(), "infeasible");
    assert!(Status::Approximate.has_cost());
    assert!(!Status::Failure.has_cost());
}
