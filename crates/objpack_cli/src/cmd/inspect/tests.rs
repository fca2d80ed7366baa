use serde_json::json;

use crate::cmd::test_support::{fixture_path, run_objpack, run_objpack_json, scratch_path};

#[test]
fn inspect_json_lists_every_top_level_value() {
	let fixture = fixture_path("points.bin");
	let path = fixture.to_str().expect("fixture path is utf-8");

	let doc = run_objpack_json(&["inspect", path, "--json"]);
	assert_eq!(doc["compression"], "none");
	assert_eq!(doc["bytes"], 10);
	assert_eq!(doc["values"], json!([[3, 4], { "x": 5, "y": 6 }]));
}

#[test]
fn inspect_text_prints_value_tree() {
	let fixture = fixture_path("points.bin");
	let path = fixture.to_str().expect("fixture path is utf-8");

	let output = run_objpack(&["inspect", path]);
	assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("compression: none"), "{stdout}");
	assert!(stdout.contains("values: 2"), "{stdout}");
	assert!(stdout.contains("[1]\n  {\n    \"x\" = 5\n"), "{stdout}");
}

#[test]
fn options_file_limits_are_enforced() {
	let fixture = fixture_path("points.bin");
	let options = scratch_path("inspect-tight.json");
	std::fs::write(&options, br#"{"max_collection_len": 1}"#).expect("write options");

	let output = run_objpack(&[
		"inspect",
		fixture.to_str().expect("fixture path is utf-8"),
		"--options",
		options.to_str().expect("scratch path is utf-8"),
	]);
	assert!(!output.status.success());
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("error: collection too large: count=2, max=1"), "{stderr}");
}

#[test]
fn missing_file_reports_io_error() {
	let output = run_objpack(&["inspect", "does-not-exist.bin"]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).starts_with("error: io:"));
}

#[test]
fn empty_file_reports_unstarted_source() {
	let path = scratch_path("empty.bin");
	std::fs::write(&path, b"").expect("write empty file");

	let output = run_objpack(&["inspect", path.to_str().expect("scratch path is utf-8")]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("source is empty or not started"));
}
