use allot_utils::*;

#[test]
fn test_mean_and_std_dev() {
    assert_eq!(mean(&[]), None);
    assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
    assert_eq!(std_dev(&[5.0]), None);
    let sd = std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
    assert!((sd - 2.138089935299395).abs() < 1e-12);
}

#[test]
fn test_percentage_gap() {
    assert_eq!(percentage_gap(110.0, 100.0), 10.0);
    assert_eq!(percentage_gap(5.0, 0.0), 0.0);
}

#[test]
fn test_paired_t_test_matches_reference() {
    // differences: 1, 2, 3, 4, 5 -> mean 3, sd sqrt(2.5), t = 3 / (sqrt(2.5) / sqrt(5))
    let a = [2.0, 4.0, 6.0, 8.0, 10.0];
    let b = [1.0, 2.0, 3.0, 4.0, 5.0];
    let test = paired_t_test(&a, &b).unwrap();
    assert_eq!(test.degrees_of_freedom, 4);
    assert!((test.statistic - 4.242640687119285).abs() < 1e-9);
    // scipy.stats.ttest_rel gives p = 0.013236...
    assert!((test.p_value - 0.013236).abs() < 1e-4);
    assert!(test.is_significant(0.05));
    assert!(!test.is_significant(0.01));
}

#[test]
fn test_paired_t_test_rejects_unequal_lengths() {
    assert!(paired_t_test(&[1.0, 2.0], &[1.0]).is_err());
    assert!(paired_t_test(&[1.0], &[1.0]).is_err());
}

#[test]
fn test_paired_t_test_identical_samples() {
    let test = paired_t_test(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap();
    assert_eq!(test.statistic, 0.0);
    assert_eq!(test.p_value, 1.0);
}
