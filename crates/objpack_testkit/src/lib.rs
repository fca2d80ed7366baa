//! Shared test helpers for workspace crates.

use std::path::{Path, PathBuf};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve a fixture path under `<workspace>/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
	workspace_root().join("fixtures").join(name)
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Parse whitespace-separated hex byte pairs, e.g. `"92 03 04"`.
///
/// Panics on malformed input; meant for test literals only.
pub fn hex(text: &str) -> Vec<u8> {
	let digits: Vec<u8> = text.bytes().filter(|byte| !byte.is_ascii_whitespace()).collect();
	assert!(digits.len() % 2 == 0, "odd number of hex digits in {text:?}");

	digits
		.chunks(2)
		.map(|pair| {
			let pair = std::str::from_utf8(pair).unwrap_or_else(|_| panic!("non-ascii hex in {text:?}"));
			u8::from_str_radix(pair, 16).unwrap_or_else(|_| panic!("invalid hex pair {pair:?} in {text:?}"))
		})
		.collect()
}

/// Render bytes as lowercase space-separated hex pairs.
pub fn to_hex(bytes: &[u8]) -> String {
	bytes.iter().map(|byte| format!("{byte:02x}")).collect::<Vec<_>>().join(" ")
}
