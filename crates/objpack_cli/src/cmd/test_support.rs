use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::OnceLock;

use objpack_testkit::{fixture_path as shared_fixture_path, target_dir as workspace_target_dir};

static OBJPACK_BIN: OnceLock<PathBuf> = OnceLock::new();

pub(crate) fn fixture_path(name: &str) -> PathBuf {
	shared_fixture_path(name)
}

/// Unique writable path for files produced by one test.
pub(crate) fn scratch_path(name: &str) -> PathBuf {
	let dir = workspace_target_dir().join("objpack-cli-tests").join(std::process::id().to_string());
	std::fs::create_dir_all(&dir).expect("scratch dir is creatable");
	dir.join(name)
}

pub(crate) fn run_objpack(args: &[&str]) -> Output {
	Command::new(objpack_bin()).args(args).output().expect("objpack command executes")
}

pub(crate) fn run_objpack_json(args: &[&str]) -> serde_json::Value {
	let output = run_objpack(args);
	assert!(
		output.status.success(),
		"objpack command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

fn objpack_bin() -> &'static PathBuf {
	OBJPACK_BIN.get_or_init(resolve_objpack_bin)
}

fn resolve_objpack_bin() -> PathBuf {
	if let Ok(path) = std::env::var("CARGO_BIN_EXE_objpack") {
		return PathBuf::from(path);
	}

	let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
	let target_dir = workspace_target_dir();

	let mut bin = target_dir.join("debug");
	bin.push(if cfg!(windows) { "objpack.exe" } else { "objpack" });

	let status = Command::new("cargo")
		.current_dir(&manifest_dir)
		.args(["build", "--quiet", "--bin", "objpack"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build objpack binary at {}", bin.display());

	bin
}
