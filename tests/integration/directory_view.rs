use predicates::prelude::*;

use super::{json_stdout, tree_cmd};

#[test]
fn root_listing_is_unloaded_directories() {
  let td = test_support::tempdir();
  let v = json_stdout(&mut tree_cmd("tree.json", td.path()));

  assert_eq!(v["dates"], serde_json::json!(["2023-07-11"]));
  let roots = v["forest"].as_array().unwrap();
  assert_eq!(roots.len(), 2);
  assert_eq!(roots[0]["id"], "//chrome");
  assert_eq!(roots[0]["name"], "chrome/");
  assert_eq!(roots[0]["loaded"], false);
  assert_eq!(roots[0]["rows"], serde_json::json!([]));
  assert_eq!(roots[0]["metrics"]["2023-07-11"]["NUM_RUNS"], 1200.0);
  // absent values normalize to zero
  assert_eq!(roots[1]["metrics"]["2023-07-11"]["NUM_FAILURES"], 0.0);
}

#[test]
fn expand_chain_reaches_tests_and_variants() {
  let td = test_support::tempdir();
  let mut cmd = tree_cmd("tree.json", td.path());
  cmd.args([
    "--expand",
    "//chrome",
    "--expand",
    "//chrome/browser",
    "--expand",
    "//chrome/browser/prefs_unittest.cc",
  ]);
  let v = json_stdout(&mut cmd);

  let browser = &v["forest"][0]["rows"][0];
  assert_eq!(browser["id"], "//chrome/browser");
  assert_eq!(browser["loaded"], true);

  let file = &browser["rows"][1];
  assert_eq!(file["type"], "FILENAME");
  assert_eq!(file["loaded"], true);
  assert!(file.get("footer").is_none());

  let test = &file["rows"][0];
  assert_eq!(test["kind"], "test");
  assert_eq!(test["name"], "PrefsTest.LoadDefaults");
  assert_eq!(test["rows"][0]["kind"], "variant");
  assert_eq!(test["rows"][0]["subname"], "ci/linux-rel");
  // untouched sibling stays unloaded
  assert_eq!(v["forest"][1]["loaded"], false);
}

#[test]
fn see_more_follows_the_footer() {
  let td = test_support::tempdir();
  let file = "//chrome/browser/ui/tab_strip_unittest.cc";
  let expand = [
    "--page-size",
    "2",
    "--expand",
    "//chrome",
    "--expand",
    "//chrome/browser",
    "--expand",
    "//chrome/browser/ui",
    "--expand",
    file,
  ];

  let v = json_stdout(tree_cmd("tree.json", td.path()).args(expand));
  let node = &v["forest"][0]["rows"][0]["rows"][0]["rows"][0];
  assert_eq!(node["rows"].as_array().unwrap().len(), 2);
  assert_eq!(node["footer"]["fileId"], file);
  assert_eq!(node["footer"]["pagesLoaded"], 1);

  let v = json_stdout(tree_cmd("tree.json", td.path()).args(expand).args(["--more", file]));
  let node = &v["forest"][0]["rows"][0]["rows"][0]["rows"][0];
  assert_eq!(node["rows"].as_array().unwrap().len(), 3);
  assert!(node.get("footer").is_none());
}

#[test]
fn tree_format_marks_expansion_state() {
  let td = test_support::tempdir();
  tree_cmd("tree.json", td.path())
    .args(["--format", "tree", "--expand", "//infra"])
    .assert()
    .success()
    .stdout(predicate::str::contains(
      "+ chrome/  runs=1200  failures=14  avg_runtime=2.50  total_runtime=3000  avg_cores=1.20\n",
    ))
    .stdout(predicate::str::contains("- infra/  runs=80  failures=0"))
    .stdout(predicate::str::contains("\n  + tools_test.py  runs=80"));
}

#[test]
fn timeline_asks_for_five_columns() {
  let td = test_support::tempdir();
  let v = json_stdout(tree_cmd("tree.json", td.path()).args(["--timeline", "--period", "week"]));
  assert_eq!(
    v["dates"],
    serde_json::json!(["2023-06-13", "2023-06-20", "2023-06-27", "2023-07-04", "2023-07-11"])
  );
  assert_eq!(v["params"]["sortIndex"], 4);
}

#[test]
fn expanding_an_unlisted_node_fails() {
  let td = test_support::tempdir();
  tree_cmd("tree.json", td.path())
    .args(["--expand", "//chrome/browser"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("//chrome/browser"));
}

#[test]
fn backend_failure_exits_non_zero() {
  let td = test_support::tempdir();
  tree_cmd("tests_unavailable.json", td.path())
    .args(["--expand", "//infra", "--expand", "//infra/tools_test.py"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("FetchTestMetrics"));
}

#[test]
fn writes_report_to_out_file() {
  let td = test_support::tempdir();
  let out = td.path().join("reports").join("tree.json");
  tree_cmd("tree.json", td.path())
    .arg("--out")
    .arg(&out)
    .assert()
    .success()
    .stdout(predicate::str::is_empty());

  let v: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
  assert_eq!(v["forest"][0]["id"], "//chrome");
}
