use allot_challenges::{ampl, classroom, transport, AmplInstance};
use std::fs;

#[test]
fn test_transport_data() {
    let challenge =
        transport::Challenge::new(vec![5, 6], vec![4], vec![vec![3], vec![2]]).unwrap();
    assert_eq!(
        challenge.ampl_data(),
        "set I := i0 i1;\nset J := j0;\n\nparam O :=\ni0 5\ni1 6\n;\n\nparam D :=\nj0 4\n;\n\nparam C : j0 :=\ni0 3\ni1 2\n;\n"
    );
    assert_eq!(transport::Challenge::OBJECTIVE, "Total_Cost");
}

#[test]
fn test_classroom_data() {
    let challenge = classroom::Challenge::new(
        vec!["D1".into()],
        vec!["S1".into(), "S2".into()],
        vec![15],
        vec![20, 30],
        vec![vec![3, 4]],
    )
    .unwrap();
    let data = challenge.ampl_data();
    assert!(data.starts_with("set DISCIPLINES := D1;\nset ROOMS := S1 S2;\n"));
    assert!(data.contains("param D : S1 S2 :=\nD1 3 4\n;"));
    assert!(classroom::Challenge::MODEL.contains("minimize Total_Distance"));
}

#[test]
fn test_write_data_skips_existing() {
    let dir = std::env::temp_dir().join(format!("allot_ampl_{}", std::process::id()));
    let path = dir.join("transport_1x1.dat");
    let challenge = transport::Challenge::new(vec![1], vec![1], vec![vec![1]]).unwrap();
    assert!(ampl::write_data(&challenge, &path).unwrap());
    fs::write(&path, "edited").unwrap();
    assert!(!ampl::write_data(&challenge, &path).unwrap());
    assert_eq!(fs::read_to_string(&path).unwrap(), "edited");
    ampl::write_model::<transport::Challenge, _>(dir.join("transport.mod")).unwrap();
    assert!(fs::read_to_string(dir.join("transport.mod"))
        .unwrap()
        .contains("minimize Total_Cost"));
    fs::remove_dir_all(&dir).unwrap();
}
