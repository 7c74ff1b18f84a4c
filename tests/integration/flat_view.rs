use super::{json_stdout, tree_cmd};

fn names(v: &serde_json::Value) -> Vec<String> {
  v["forest"]
    .as_array()
    .unwrap()
    .iter()
    .map(|n| n["name"].as_str().unwrap().to_string())
    .collect()
}

#[test]
fn first_page_is_not_last() {
  let td = test_support::tempdir();
  let v = json_stdout(tree_cmd("tree.json", td.path()).args(["--flat", "--page-size", "2"]));

  assert_eq!(names(&v), vec!["TabStripTest.CloseTab", "TabStripTest.DragTab"]);
  assert_eq!(v["lastPage"], false);
  assert_eq!(v["forest"][0]["subname"], "//chrome/browser/ui/tab_strip_unittest.cc");
}

#[test]
fn final_page_reports_last_page() {
  let td = test_support::tempdir();
  let v = json_stdout(tree_cmd("tree.json", td.path()).args(["--flat", "--page-size", "2", "--page", "2"]));

  assert_eq!(names(&v), vec!["ToolsTest.RunsQuietly"]);
  assert_eq!(v["lastPage"], true);
  assert_eq!(v["params"]["page"], 2);
}

#[test]
fn filter_matches_test_names_case_insensitively() {
  let td = test_support::tempdir();
  let v = json_stdout(tree_cmd("tree.json", td.path()).args(["--flat", "--filter", "tabstriptest.p"]));
  assert_eq!(names(&v), vec!["TabStripTest.PinTab"]);
}

#[test]
fn directory_view_ignores_page() {
  let td = test_support::tempdir();
  let out = tree_cmd("tree.json", td.path()).args(["--page", "3"]).output().unwrap();
  assert!(out.status.success());
  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["params"]["page"], 0);
  assert!(String::from_utf8_lossy(&out.stderr).contains("--page is ignored"));
}
