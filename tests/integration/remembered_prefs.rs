use super::{json_stdout, tree_cmd};

#[test]
fn page_size_and_components_are_remembered() {
  let td = test_support::tempdir();

  let v = json_stdout(tree_cmd("tree.json", td.path()).args([
    "--flat",
    "--page-size",
    "1",
    "--component",
    "Blink>Layout",
  ]));
  assert_eq!(v["forest"].as_array().unwrap().len(), 1);

  let stored: serde_json::Value =
    serde_json::from_str(&std::fs::read_to_string(td.path().join("prefs.json")).unwrap()).unwrap();
  assert_eq!(stored["page_size"], 1);
  assert_eq!(stored["components"], serde_json::json!(["Blink>Layout"]));

  // No flags this time: both come back from prefs.json.
  let v = json_stdout(tree_cmd("tree.json", td.path()).args(["--flat"]));
  assert_eq!(v["forest"].as_array().unwrap().len(), 1);
  assert_eq!(v["params"]["pageSize"], 1);
  assert_eq!(v["components"], serde_json::json!(["Blink>Layout"]));
}

#[test]
fn unreadable_prefs_fall_back_to_defaults() {
  let td = test_support::tempdir();
  std::fs::write(td.path().join("prefs.json"), "{ nope").unwrap();

  let v = json_stdout(tree_cmd("tree.json", td.path()).args(["--flat"]));
  assert_eq!(v["params"]["pageSize"], 25);
  assert_eq!(v["forest"].as_array().unwrap().len(), 5);
}
