use std::path::Path;

use objpack::pack::{Compression, PackOptions, Result, decode_bytes};

/// Load reader options from a JSON file, falling back to the inspection preset.
pub(crate) fn load_options(path: Option<&Path>) -> Result<PackOptions> {
	let Some(path) = path else {
		return Ok(PackOptions::for_inspect());
	};

	let raw = std::fs::read(path)?;
	let options = serde_json::from_slice(&raw).map_err(std::io::Error::from)?;
	log::debug!("loaded options from {}", path.display());
	Ok(options)
}

/// Read a packed stream from disk, expanding zstd frames.
pub(crate) fn read_stream(path: &Path) -> Result<(Compression, Vec<u8>)> {
	let raw = std::fs::read(path)?;
	decode_bytes(raw)
}

#[cfg(test)]
mod tests {
	use objpack::pack::SerializationMethod;

	use super::load_options;
	use crate::cmd::test_support::scratch_path;

	#[test]
	fn missing_options_use_inspect_preset() {
		let options = load_options(None).expect("preset");
		assert_eq!(options.max_depth, 16);
	}

	#[test]
	fn partial_options_file_keeps_defaults() {
		let path = scratch_path("options-partial.json");
		std::fs::write(&path, br#"{"method": "map", "max_depth": 3}"#).expect("write options");

		let options = load_options(Some(&path)).expect("options");
		assert_eq!(options.method, SerializationMethod::Map);
		assert_eq!(options.max_depth, 3);
		assert_eq!(options.max_collection_len, 1 << 20);
	}

	#[test]
	fn malformed_options_file_is_io_error() {
		let path = scratch_path("options-bad.json");
		std::fs::write(&path, b"{ method").expect("write options");

		let err = load_options(Some(&path)).expect_err("bad json");
		assert!(matches!(err, objpack::pack::PackError::Io(_)));
	}
}
