use std::fmt;

use crate::pack::{PackError, Packer, Result, Unpacker};

/// Encoder/decoder pair for one Rust type.
///
/// `unpack` expects the reader to be positioned on the value's first token (the header for
/// composite values) and leaves it on the value's last consumed token. Implementations are
/// immutable after construction and may be shared across threads.
pub trait PackCodec<T>: Send + Sync {
	/// Write `value` as one complete wire value.
	fn pack(&self, packer: &mut Packer, value: &T) -> Result<()>;

	/// Decode a fresh value from the current position.
	fn unpack(&self, unpacker: &mut Unpacker<'_>) -> Result<T>;

	/// Decode into an existing collection, appending to its contents.
	fn unpack_to(&self, unpacker: &mut Unpacker<'_>, collection: &mut T) -> Result<()> {
		let _ = (unpacker, collection);
		Err(PackError::UnsupportedOperation { operation: "unpack_to" })
	}

	/// Short name of the encoded type for diagnostics.
	fn type_name(&self) -> &'static str {
		std::any::type_name::<T>()
	}

	/// Render the codec structure. Multi-line output indents continuation lines by `indent`.
	fn dump(&self, out: &mut dyn fmt::Write, indent: usize) -> fmt::Result {
		let _ = indent;
		out.write_str(self.type_name())
	}
}

/// Advance to the next token of a value that must exist.
pub(crate) fn next_token(unpacker: &mut Unpacker<'_>) -> Result<()> {
	if unpacker.advance()? {
		Ok(())
	} else {
		Err(PackError::UnexpectedEndOfStream { at: unpacker.position() })
	}
}

/// Decode the current value, scoping composite values to a bounded sub-reader.
pub fn unpack_item<T>(codec: &dyn PackCodec<T>, unpacker: &mut Unpacker<'_>) -> Result<T> {
	if unpacker.is_collection_header() {
		let mut subtree = unpacker.read_subtree()?;
		codec.unpack(&mut subtree)
	} else {
		codec.unpack(unpacker)
	}
}

/// Decode the current value into `target`, scoping composite values to a bounded sub-reader.
pub fn unpack_item_to<T>(codec: &dyn PackCodec<T>, unpacker: &mut Unpacker<'_>, target: &mut T) -> Result<()> {
	if unpacker.is_collection_header() {
		let mut subtree = unpacker.read_subtree()?;
		codec.unpack_to(&mut subtree, target)
	} else {
		codec.unpack_to(unpacker, target)
	}
}

/// Declared element count of the current array header.
pub(crate) fn array_len(unpacker: &Unpacker<'_>) -> Result<usize> {
	let token = unpacker.expect_current()?;
	if !unpacker.is_array_header() {
		return Err(unpacker.unexpected("array", token));
	}
	Ok(unpacker.item_count().unwrap_or(0) as usize)
}

/// Declared entry count of the current map header.
pub(crate) fn map_len(unpacker: &Unpacker<'_>) -> Result<usize> {
	let token = unpacker.expect_current()?;
	if !unpacker.is_map_header() {
		return Err(unpacker.unexpected("map", token));
	}
	Ok(unpacker.item_count().unwrap_or(0) as usize)
}
