use std::io::Read;

use crate::pack::{PackError, Result};

const MAX_DECOMPRESSED_BYTES: usize = 512 * 1024 * 1024;
/// zstd frame magic used by compressed streams.
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Compression mode detected for a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
	/// Raw packed stream.
	None,
	/// zstd-compressed stream.
	Zstd,
}

impl Compression {
	/// Render compression mode as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Zstd => "zstd",
		}
	}
}

/// Detect and decode compression, returning `(mode, decoded_bytes)`.
///
/// Anything that does not start with the zstd frame magic is treated as a raw stream.
pub fn decode_bytes(raw: Vec<u8>) -> Result<(Compression, Vec<u8>)> {
	if raw.starts_with(&ZSTD_MAGIC) {
		let out = decode_zstd(&raw)?;
		return Ok((Compression::Zstd, out));
	}

	Ok((Compression::None, raw))
}

/// Compress a packed stream into a single zstd frame.
pub fn encode_zstd(raw: &[u8], level: i32) -> Result<Vec<u8>> {
	Ok(zstd::stream::encode_all(raw, level)?)
}

fn decode_zstd(raw: &[u8]) -> Result<Vec<u8>> {
	let mut decoder = zstd::stream::read::Decoder::new(raw)?;
	let mut out = Vec::new();
	let mut buf = [0_u8; 8192];

	loop {
		let read = decoder.read(&mut buf)?;
		if read == 0 {
			break;
		}

		if out.len() + read > MAX_DECOMPRESSED_BYTES {
			return Err(PackError::DecompressedTooLarge { limit: MAX_DECOMPRESSED_BYTES });
		}

		out.extend_from_slice(&buf[..read]);
	}

	Ok(out)
}

#[cfg(test)]
mod tests {
	use super::{Compression, decode_bytes, encode_zstd};

	#[test]
	fn raw_stream_passes_through() {
		let (mode, bytes) = decode_bytes(vec![0x92, 0x03, 0x04]).expect("decode");
		assert_eq!(mode, Compression::None);
		assert_eq!(bytes, vec![0x92, 0x03, 0x04]);
	}

	#[test]
	fn zstd_frame_is_detected_and_expanded() {
		let raw = vec![0x91, 0xC0];
		let compressed = encode_zstd(&raw, 3).expect("compress");
		let (mode, bytes) = decode_bytes(compressed).expect("decode");
		assert_eq!(mode, Compression::Zstd);
		assert_eq!(bytes, raw);
	}
}
