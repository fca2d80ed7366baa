use std::path::PathBuf;

use objpack_testkit::hex;
use serde_json::json;

use crate::cmd::test_support::{run_objpack, run_objpack_json, scratch_path};

fn write_json(name: &str, doc: &serde_json::Value) -> PathBuf {
	let path = scratch_path(name);
	std::fs::write(&path, doc.to_string()).expect("write json input");
	path
}

fn utf8(path: &std::path::Path) -> &str {
	path.to_str().expect("scratch path is utf-8")
}

#[test]
fn plain_output_is_packed_value() {
	let input = write_json("pack-plain.json", &json!({ "x": 3 }));
	let output = scratch_path("pack-plain.bin");

	let run = run_objpack(&["pack", utf8(&input), "-o", utf8(&output)]);
	assert!(run.status.success(), "{}", String::from_utf8_lossy(&run.stderr));
	assert_eq!(std::fs::read(&output).expect("read output"), hex("81 a1 78 03"));
}

#[test]
fn zstd_output_round_trips_through_inspect() {
	let doc = json!({
		"name": "sample",
		"ratio": 0.5,
		"tags": [1, -2, true, null],
	});
	let input = write_json("pack-zstd.json", &doc);
	let output = scratch_path("pack-zstd.bin");

	let run = run_objpack(&["pack", utf8(&input), "--output", utf8(&output), "--zstd"]);
	assert!(run.status.success(), "{}", String::from_utf8_lossy(&run.stderr));

	let inspected = run_objpack_json(&["inspect", utf8(&output), "--json"]);
	assert_eq!(inspected["compression"], "zstd");
	assert_eq!(inspected["values"], json!([doc]));
}

#[test]
fn malformed_json_fails() {
	let input = scratch_path("pack-bad.json");
	std::fs::write(&input, b"{ \"x\": ").expect("write input");
	let output = scratch_path("pack-bad.bin");

	let run = run_objpack(&["pack", utf8(&input), "-o", utf8(&output)]);
	assert!(!run.status.success());
	assert!(String::from_utf8_lossy(&run.stderr).starts_with("error: io:"));
}
