//! End-to-end runs of the mi-energia binary against the sample households.

use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mi-energia"))
        .args(args)
        .output()
        .expect("mi-energia process should run")
}

#[test]
fn sample_households_produce_reports() {
    for path in ["households/santiago.toml", "households/punta_arenas.toml"] {
        let output = run(&["--household", path, "--savings", "15"]);
        assert!(
            output.status.success(),
            "run failed for {path}: stderr={}",
            String::from_utf8_lossy(&output.stderr)
        );
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("--- Estimate Report ---"));
        assert!(stdout.contains("--- Savings at 15% ---"));
    }
}

#[test]
fn region_override_changes_tariff() {
    let output = run(&["--household", "households/santiago.toml", "--region", "XII"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Magallanes (XII)"));
}

#[test]
fn comparison_without_saving_reports_never() {
    let output = run(&[
        "--household",
        "households/santiago.toml",
        "--compare",
        "led_bulb,incandescent_bulb",
        "--price-delta",
        "-2000",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("never (no saving)"));
}

#[test]
fn save_and_history_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = dir.path().join("scenarios.json");
    let store = store.to_str().expect("utf-8 path");

    let saved = run(&[
        "--household",
        "households/santiago.toml",
        "--store",
        store,
        "--save",
        "marzo",
    ]);
    assert!(
        saved.status.success(),
        "save failed: {}",
        String::from_utf8_lossy(&saved.stderr)
    );

    let history = run(&["--store", store, "--history", "--rut", "12345678-5"]);
    assert!(history.status.success());
    let stdout = String::from_utf8_lossy(&history.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "id,name,region,created_at,kwh,cost,co2");
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains(",marzo,RM,"));
}

#[test]
fn invalid_input_exits_with_error() {
    let unknown_region = run(&["--household", "households/santiago.toml", "--region", "ZZ"]);
    assert_eq!(unknown_region.status.code(), Some(1));

    let conflicting = run(&[
        "--household",
        "households/santiago.toml",
        "--tables",
        "a.toml",
        "--preset",
        "chile_2024",
    ]);
    assert_eq!(conflicting.status.code(), Some(1));

    let bad_rut = run(&["--store", "unused.json", "--history", "--rut", "12.345.678-9"]);
    assert_eq!(bad_rut.status.code(), Some(1));
}
