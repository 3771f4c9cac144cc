use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn regcal() -> Command {
    let mut cmd = Command::cargo_bin("regcal").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn test_civil_in_new_york() {
    let value = json(regcal().args([
        "--timezone",
        "America/New_York",
        "civil",
        "2021-07-04T16:30:00Z",
    ]));
    assert_eq!(value["local"], "2021-07-04T12:30:00-04:00[America/New_York]");
    assert_eq!(value["civil"]["hour"], 12);
    assert_eq!(value["civil"]["is_dst"], true);
}

#[test]
fn test_add_month_clamps() {
    let value = json(regcal().args(["add", "2021-01-31T09:00:00Z", "+1mo"]));
    assert_eq!(value["local"], "2021-02-28T09:00:00+00:00[UTC]");
}

#[test]
fn test_add_negative_delta() {
    let value = json(regcal().args(["add", "2021-03-01T00:00:00Z", "-1d"]));
    assert_eq!(value["local"], "2021-02-28T00:00:00+00:00[UTC]");
}

#[test]
fn test_start_of_week_follows_locale() {
    let us = json(regcal().args(["--locale", "en_US", "start-of", "2021-03-10T12:00:00Z", "week"]));
    let de = json(regcal().args(["--locale", "de_DE", "start-of", "2021-03-10T12:00:00Z", "week"]));
    assert_eq!(us["local"], "2021-03-07T00:00:00+00:00[UTC]");
    assert_eq!(de["local"], "2021-03-08T00:00:00+00:00[UTC]");
}

#[test]
fn test_end_of_day() {
    regcal()
        .args(["end-of", "2021-03-10T12:00:00Z", "day"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2021-03-10T23:59:59.999999999+00:00[UTC]"));
}

#[test]
fn test_diff_breakdown() {
    let value = json(regcal().args([
        "diff",
        "2020-02-29T00:00:00Z",
        "2021-03-01T06:00:00Z",
        "--unit",
        "month",
        "--unit",
        "day",
        "--unit",
        "hour",
        "--breakdown",
    ]));
    assert_eq!(value["delta"]["months"], 12);
    assert_eq!(value["delta"]["days"], 1);
    assert_eq!(value["delta"]["hours"], 6);
    assert_eq!(value["text"], "+12mo+1d+6h");
}

#[test]
fn test_julian_and_back() {
    let value = json(regcal().args(["julian", "2000-01-01T12:00:00Z"]));
    assert_eq!(value["value"], 2_451_545.0);
    let value = json(regcal().args(["from-julian", "51544.5", "--modified"]));
    assert_eq!(value["local"], "2000-01-01T12:00:00+00:00[UTC]");
}

#[test]
fn test_compose_iso_week() {
    let value = json(regcal().args([
        "--calendar",
        "iso8601",
        "compose",
        "--year",
        "2021",
        "--week-of-year",
        "10",
        "--weekday",
        "Wed",
    ]));
    assert_eq!(value["local"], "2021-03-10T00:00:00+00:00[UTC]");
}

#[test]
fn test_compose_invalid_date_fails() {
    regcal()
        .args(["compose", "--year", "2021", "--month", "2", "--day", "30"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn test_weekend_and_same() {
    let friday = "2021-06-18T12:00:00Z";
    let value = json(regcal().args(["--locale", "fa_IR", "weekend", friday]));
    assert_eq!(value["value"], true);
    let value = json(regcal().args(["same", friday, "2021-06-20T12:00:00Z", "week"]));
    assert_eq!(value["value"], false);
}

#[test]
fn test_invalid_timezone_is_an_error() {
    regcal()
        .args(["--timezone", "Mars/Olympus_Mons", "civil", "2021-01-01T00:00:00Z"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Mars/Olympus_Mons"));
}

#[test]
fn test_config_file_sets_region() {
    let dir = std::env::temp_dir().join(format!("regcal-test-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("regcal.json");
    fs::write(
        &path,
        r#"{"default_region": {"timezone": "Asia/Kolkata", "locale": "hi_IN"}}"#,
    )
    .unwrap();

    let value = json(regcal().arg("--config").arg(&path).args(["civil", "2021-01-01T00:00:00Z"]));
    assert_eq!(value["local"], "2021-01-01T05:30:00+05:30[Asia/Kolkata]");

    // Flags override the file.
    let value = json(regcal().arg("--config").arg(&path).args([
        "--timezone",
        "UTC",
        "civil",
        "2021-01-01T00:00:00Z",
    ]));
    assert_eq!(value["local"], "2021-01-01T00:00:00+00:00[UTC]");

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_config_file() {
    regcal()
        .args(["--config", "/nonexistent/regcal.json", "civil", "2021-01-01T00:00:00Z"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config"));
}
