use predicates::prelude::*;

use super::tree_cmd;

#[test]
fn zero_page_size_is_rejected() {
  let td = test_support::tempdir();
  tree_cmd("tree.json", td.path())
    .args(["--page-size", "0"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("--page-size must be greater than 0"));
}

#[test]
fn malformed_date_is_rejected() {
  let td = test_support::tempdir();
  let fixture = test_support::fixture_path("tree.json");
  test_support::cmd_bin(super::BIN)
    .env("TEST_METRICS_PREFS", td.path().join("prefs.json"))
    .args(["--fixture", fixture.as_str(), "--date", "11/07/2023"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("YYYY-MM-DD"))
    .stderr(predicate::str::contains("11/07/2023"));
}

#[test]
fn expand_needs_directory_view() {
  let td = test_support::tempdir();
  tree_cmd("tree.json", td.path())
    .args(["--flat", "--expand", "//chrome"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("--expand only applies to the directory view"));
}

#[test]
fn unknown_metric_is_rejected_by_clap() {
  let td = test_support::tempdir();
  tree_cmd("tree.json", td.path())
    .args(["--metric", "num-widgets"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("num-widgets"));
}

#[test]
fn missing_fixture_names_the_path() {
  let td = test_support::tempdir();
  test_support::cmd_bin(super::BIN)
    .env("TEST_METRICS_PREFS", td.path().join("prefs.json"))
    .args(["--fixture", "/no/such/fixture.json"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("/no/such/fixture.json"));
}
