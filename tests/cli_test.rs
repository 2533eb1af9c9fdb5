//! Exit codes and messages of the `reduce_epsilons` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn reduce_epsilons(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_reduce_epsilons"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to launch reduce_epsilons")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn write_asc(path: &Path, body: &str) {
    let text = format!("ncols 2\nnrows 1\nNODATA_value -9999\n{body}\n");
    fs::write(path, text).unwrap();
}

/// Inputs for a run whose epsilon raster is entirely nodata.
fn all_nodata_inputs() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("gis")).unwrap();
    write_asc(&root.join("gis/population.asc"), "500 700");
    write_asc(&root.join("beta.asc"), "0.025 0.03");
    write_asc(&root.join("epsilon.asc"), "-9999 -9999");
    fs::write(root.join("calibration.csv"), "zone,population,treatment,pfpr,beta\n0,500,0.8,0.1,0.5\n").unwrap();
    let config = format!(
        "raster_db:\n  population_raster: population.asc\n\
         treatment: 0.8\n\
         reduction:\n  calibration: {root}/calibration.csv\n  beta: {root}/beta.asc\n  \
         epsilon: {root}/epsilon.asc\n  results: {root}/out/reduction.csv\n  script: {root}/out/script.sh\n",
        root = root.display()
    );
    fs::write(root.join("config.yml"), config).unwrap();
    dir
}

#[test]
fn test_wrong_argument_count_prints_usage() {
    let cases: [&[&str]; 4] = [
        &[],
        &["a", "b", "c"],
        &["a", "b", "0.1"],
        &["a", "b", "0.1", "0.001", "alice", "extra"],
    ];
    for args in cases {
        let output = reduce_epsilons(args);
        assert_eq!(output.status.code(), Some(0), "args {args:?} should exit 0");
        assert!(stdout(&output).contains("Usage"), "args {args:?} should print usage, got {}", stdout(&output));
    }
}

#[test]
fn test_step_of_one_exits_with_failure() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("absent.yml");
    let output = reduce_epsilons(&[config.to_str().unwrap(), "gis", "0.1", "1.0", "alice"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("cannot be greater than one"), "got {}", stdout(&output));
}

#[test]
fn test_step_with_seven_decimals_exits_with_failure() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("absent.yml");
    let output = reduce_epsilons(&[config.to_str().unwrap(), "gis", "0.1", "0.0000001", "alice"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("exceeds maximum step of 0.00001"), "got {}", stdout(&output));
}

#[test]
fn test_all_nodata_reports_nothing_to_reduce() {
    let dir = all_nodata_inputs();
    let root = dir.path();
    let config = root.join("config.yml");
    let gis = root.join("gis");
    let output = reduce_epsilons(&[config.to_str().unwrap(), gis.to_str().unwrap(), "0.1", "0.001", "alice"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout(&output).contains("Nothing to reduce!"));
    assert!(!root.join("out").exists(), "no output may be written");
}

#[test]
fn test_missing_configuration_exits_with_failure() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("absent.yml");
    let output = reduce_epsilons(&[config.to_str().unwrap(), "gis", "0.1", "0.001", "alice"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!stdout(&output).contains("Nothing to reduce!"));
}
