use allot_algorithms::ampl::*;
use allot_structs::results::Status;

#[test]
fn test_solver_from_code() {
    assert_eq!(solver_from_code("ampl_highs"), Some("highs"));
    assert_eq!(solver_from_code("ampl_"), None);
    assert_eq!(solver_from_code("vogel"), None);
}

#[test]
fn test_parse_output() {
    let stdout = "HiGHS 1.6.0: optimal solution; objective 775\n5 simplex iterations\nsolve_result = solved\nTotal_Cost = 775\n\n";
    let outcome = parse_output(stdout, "Total_Cost").unwrap();
    assert_eq!(outcome.status, Status::Optimal);
    assert_eq!(outcome.objective, Some(775.0));

    let outcome = parse_output("solve_result = infeasible\n", "Total_Cost").unwrap();
    assert_eq!(outcome.status, Status::Infeasible);
    assert_eq!(outcome.objective, None);

    assert!(parse_output("Total_Cost = 3\n", "Total_Cost").is_err());
    assert!(parse_output("solve_result = solved\nTotal_Cost = abc\n", "Total_Cost").is_err());
}

#[test]
fn test_status_from_solve_result() {
    assert_eq!(status_from_solve_result("solved?"), Status::Approximate);
    assert_eq!(status_from_solve_result("failure"), Status::Failure);
}

#[test]
fn test_missing_executable_is_an_error() {
    let challenge =
        allot_challenges::transport::Challenge::new(vec![1], vec![1], vec![vec![1]]).unwrap();
    let mut options = AmplOptions::new("highs");
    options.executable = "allot-no-such-ampl-binary".to_string();
    options.folder = std::env::temp_dir().join(format!("allot_ampl_run_{}", std::process::id()));
    assert!(solve(&challenge, "1x1", &options).is_err());
    std::fs::remove_dir_all(&options.folder).unwrap();
}
