use allot_challenges::classroom::*;
use std::fs;

fn small_challenge() -> Challenge {
    Challenge::new(
        vec!["D1".into(), "D2".into()],
        vec!["S1".into(), "S2".into(), "S3".into()],
        vec![40, 20],
        vec![30, 50, 20],
        vec![vec![1, 2, 3], vec![4, 5, 6]],
    )
    .unwrap()
}

#[test]
fn test_generate_instance_is_deterministic() {
    let difficulty = Difficulty::new(20, 25);
    let a = Challenge::generate_instance(42, &difficulty).unwrap();
    let b = Challenge::generate_instance(42, &difficulty).unwrap();
    let c = Challenge::generate_instance(43, &difficulty).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_generate_instance_respects_ranges() {
    let difficulty = Difficulty::new(50, 60);
    let challenge = Challenge::generate_instance(7, &difficulty).unwrap();
    assert_eq!(challenge.num_disciplines(), 50);
    assert_eq!(challenge.num_rooms(), 60);
    assert_eq!(challenge.disciplines[0], "D1");
    assert_eq!(challenge.rooms[59], "S60");
    assert!(challenge.capacities.iter().all(|&c| (30..=90).contains(&c)));
    assert!(challenge.students.iter().all(|&s| s >= 10));
    let max_capacity = *challenge.capacities.iter().max().unwrap();
    for i in 0..50 {
        assert!(challenge.students[i] <= max_capacity);
        assert!((0..60).any(|j| challenge.fits(i, j)));
        assert!(challenge.distances[i].iter().all(|&d| (1..10).contains(&d)));
    }
}

#[test]
fn test_generate_instance_rejects_bad_difficulty() {
    assert!(Challenge::generate_instance(0, &Difficulty::new(5, 4)).is_err());
    assert!(Challenge::generate_instance(0, &Difficulty::new(0, 4)).is_err());
    let mut difficulty = Difficulty::new(3, 3);
    difficulty.min_distance = 5;
    difficulty.max_distance = 5;
    assert!(Challenge::generate_instance(0, &difficulty).is_err());
    let mut difficulty = Difficulty::new(3, 3);
    difficulty.min_students = 95;
    difficulty.max_students = 99;
    assert!(Challenge::generate_instance(0, &difficulty).is_err());
}

#[test]
fn test_instance_name() {
    let difficulty = Difficulty::new(101, 101);
    assert_eq!(
        difficulty.file_name(42),
        "classroom_D101_S101_[10,90]_[30,90]_[1,10]_seed42.csv"
    );
    let parsed: Difficulty =
        serde_json::from_str(r#"{"num_disciplines": 3, "num_rooms": 4, "max_distance": 20}"#)
            .unwrap();
    assert_eq!(parsed.min_students, 10);
    assert_eq!(parsed.max_distance, 20);
}

#[test]
fn test_verify_solution() {
    let challenge = small_challenge();
    assert!(challenge
        .verify_solution(&Solution { assignment: vec![1, 0] })
        .is_ok());
    // D1 does not fit S1
    assert!(challenge
        .verify_solution(&Solution { assignment: vec![0, 1] })
        .is_err());
    // shared room
    assert!(challenge
        .verify_solution(&Solution { assignment: vec![1, 1] })
        .is_err());
    assert!(challenge
        .verify_solution(&Solution { assignment: vec![1] })
        .is_err());
    assert!(challenge
        .verify_solution(&Solution { assignment: vec![1, 3] })
        .is_err());
}

#[test]
fn test_verify_shared_capacity() {
    let challenge = small_challenge();
    // 40 + 20 > 50
    assert!(challenge
        .verify_shared_capacity(&Solution { assignment: vec![1, 1] })
        .is_err());
    let challenge = Challenge::new(
        vec!["D1".into(), "D2".into()],
        vec!["S1".into()],
        vec![20, 25],
        vec![50],
        vec![vec![1], vec![2]],
    )
    .unwrap();
    assert!(challenge
        .verify_shared_capacity(&Solution { assignment: vec![0, 0] })
        .is_ok());
}

#[test]
fn test_evaluate_total_cost() {
    let challenge = small_challenge();
    let cost = challenge
        .evaluate_total_cost(&Solution { assignment: vec![1, 2] })
        .unwrap();
    assert_eq!(cost, 40 * 2 + 20 * 6);
}

#[test]
fn test_csv_round_trip_and_errors() {
    let dir = std::env::temp_dir().join(format!("allot_classroom_{}", std::process::id()));
    let path = dir.join("instance.csv");
    let challenge = Challenge::generate_instance(42, &Difficulty::new(6, 8)).unwrap();
    challenge.write_csv(&path).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("D1,D2,D3,D4,D5,D6\nS1,"));
    assert_eq!(Challenge::read_csv(&path).unwrap(), challenge);

    fs::write(&path, "D1,D2\nS1,S2\n10,x\n30,30\n1,2\n3,4\n").unwrap();
    let err = Challenge::read_csv(&path).unwrap_err().to_string();
    assert!(err.contains("invalid value 'x'"), "{}", err);

    fs::write(&path, "D1,D2\nS1,S2\n10,20\n30,30\n1,2\n").unwrap();
    assert!(Challenge::read_csv(&path).is_err());

    fs::write(&path, "D1\nS1\n10\n30\n1\n2\n").unwrap();
    let err = Challenge::read_csv(&path).unwrap_err().to_string();
    assert!(err.contains("1 distance rows, found 6 rows"), "{}", err);
    fs::remove_dir_all(&dir).unwrap();
}
