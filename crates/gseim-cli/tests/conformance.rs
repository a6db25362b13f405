//! End-to-end checks of the `gseim_solver` binary.
//!
//! Each scenario runs the real binary as a subprocess in a scratch
//! directory, with `HOME=not set` the way batch schedulers launch it, and
//! checks the full contract: completion marker, exit status, artifact next
//! to the input, byte-identical output across reruns, and an exact byte
//! match against the blessed reference in `test_data/output/` so a solver
//! change can never silently alter results.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_gseim_solver");
const MARKER: &str = "Program completed.";

fn scenario_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("test_data/input")
        .join(name)
}

fn reference_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("test_data/output")
        .join(Path::new(name).with_extension("dat"))
}

fn run_solver(input: &Path) -> Output {
    Command::new(BIN)
        .arg(input)
        .env("HOME", "not set")
        .env_remove("GSEIM_HOME")
        .output()
        .expect("failed to launch gseim_solver")
}

fn check_scenario(name: &str) {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join(name);
    fs::copy(scenario_path(name), &input).unwrap();

    let out = run_solver(&input);
    assert!(
        out.status.success(),
        "{name}: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains(MARKER),
        "{name}: marker missing from stdout: {stdout}"
    );

    let dat = input.with_extension("dat");
    let first = fs::read(&dat).expect("result artifact not written");
    assert!(!first.is_empty(), "{name}: empty artifact");

    // Exact match against the blessed reference.
    let expected = fs::read(reference_path(name)).expect("reference artifact missing");
    assert_eq!(
        first, expected,
        "{name}: artifact differs from the blessed reference"
    );

    // Same input, same bytes.
    let out = run_solver(&input);
    assert!(out.status.success());
    let second = fs::read(&dat).unwrap();
    assert_eq!(first, second, "{name}: reruns must be byte-identical");
}

#[test]
fn test_scenario_test_1() {
    check_scenario("test_1.in");
}

#[test]
fn test_scenario_test_2() {
    check_scenario("test_2.in");
}

#[test]
fn test_scenario_test_3() {
    check_scenario("test_3.in");
}

#[test]
fn test_scenario_test_4() {
    check_scenario("test_4.in");
}

#[test]
fn test_scenario_test_5() {
    check_scenario("test_5.in");
}

#[test]
fn test_scenario_buck() {
    check_scenario("buck.in");
}

#[test]
fn test_scenario_ac_controller_1() {
    check_scenario("ac_controller_1.in");
}

#[test]
fn test_scenario_controlled_rectifier_2() {
    check_scenario("controlled_rectifier_2.in");
}

#[test]
fn test_missing_input_fails_without_marker() {
    let dir = TempDir::new().unwrap();
    let out = run_solver(&dir.path().join("absent.in"));

    assert_eq!(out.status.code(), Some(1));
    assert!(!String::from_utf8_lossy(&out.stdout).contains(MARKER));
}

#[test]
fn test_no_arguments_is_a_usage_error() {
    let out = Command::new(BIN)
        .env("HOME", "not set")
        .output()
        .expect("failed to launch gseim_solver");

    assert_eq!(out.status.code(), Some(1));
    assert!(!String::from_utf8_lossy(&out.stdout).contains(MARKER));
}

#[test]
fn test_extra_arguments_are_a_usage_error() {
    let out = Command::new(BIN)
        .args(["a.in", "b.in"])
        .env("HOME", "not set")
        .output()
        .expect("failed to launch gseim_solver");

    assert_eq!(out.status.code(), Some(1));
    assert!(!String::from_utf8_lossy(&out.stdout).contains(MARKER));
}

#[test]
fn test_malformed_input_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.in");
    // Resistor without its value, and no solve block.
    fs::write(&input, "begin_circuit\nres r1 1 0\nend_circuit\n").unwrap();

    let out = run_solver(&input);
    assert_eq!(out.status.code(), Some(2));
    assert!(!String::from_utf8_lossy(&out.stdout).contains(MARKER));
    assert!(!input.with_extension("dat").exists());
}

#[test]
fn test_failed_rerun_preserves_previous_artifact() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("test_1.in");
    fs::copy(scenario_path("test_1.in"), &input).unwrap();

    let out = run_solver(&input);
    assert!(out.status.success());
    let dat = input.with_extension("dat");
    let good = fs::read(&dat).unwrap();

    // Corrupt the scenario; the failing run must not touch the artifact.
    fs::write(&input, "begin_circuit\nnonsense\n").unwrap();
    let out = run_solver(&input);
    assert!(!out.status.success());
    assert_eq!(fs::read(&dat).unwrap(), good);
}

#[test]
fn test_singular_circuit_is_a_numeric_error() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("floating.in");
    // A current source into a node with no conductance path.
    fs::write(
        &input,
        "begin_circuit\n\
         isrc i1 0 float dc=1\n\
         end_circuit\n\
         begin_solve\n\
         t_end=1m\n\
         t_step=10u\n\
         end_solve\n",
    )
    .unwrap();

    let out = run_solver(&input);
    assert_eq!(out.status.code(), Some(3));
    assert!(!String::from_utf8_lossy(&out.stdout).contains(MARKER));
    assert!(!input.with_extension("dat").exists());
}

#[test]
fn test_explicit_config_overrides_ambient_lookup() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("test_4.in");
    fs::copy(scenario_path("test_4.in"), &input).unwrap();
    let conf = dir.path().join("solver.conf");
    fs::write(&conf, "itmax=200\n").unwrap();

    let out = Command::new(BIN)
        .arg(&input)
        .arg("--config")
        .arg(&conf)
        .env("HOME", "not set")
        .output()
        .expect("failed to launch gseim_solver");

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stdout).contains(MARKER));
}
