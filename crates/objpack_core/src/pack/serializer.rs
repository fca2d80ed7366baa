use std::sync::Arc;

use crate::pack::{CodecRegistry, PackCodec, PackError, PackOptions, Packable, Packer, Result, Unpacker, unpack_item};

/// Packs and unpacks one type to and from byte buffers.
pub struct Serializer<T> {
	codec: Arc<dyn PackCodec<T>>,
	options: PackOptions,
}

impl<T> Clone for Serializer<T> {
	fn clone(&self) -> Self {
		Self {
			codec: Arc::clone(&self.codec),
			options: self.options.clone(),
		}
	}
}

impl<T: Packable> Serializer<T> {
	/// Resolve the codec for `T` from `registry`.
	pub fn new(registry: &CodecRegistry) -> Result<Self> {
		Ok(Self {
			codec: registry.resolve::<T>()?,
			options: registry.options().clone(),
		})
	}
}

impl<T> Serializer<T> {
	/// Underlying codec.
	pub fn codec(&self) -> &Arc<dyn PackCodec<T>> {
		&self.codec
	}

	/// Encode one value.
	pub fn pack(&self, value: &T) -> Result<Vec<u8>> {
		let mut packer = Packer::new();
		self.codec.pack(&mut packer, value)?;
		Ok(packer.into_inner())
	}

	/// Decode the first value of `bytes`. Trailing bytes are left unread.
	pub fn unpack(&self, bytes: &[u8]) -> Result<T> {
		let mut unpacker = Unpacker::with_options(bytes, &self.options);
		self.unpack_next(&mut unpacker)
	}

	/// Decode the next value of a stream that may hold several.
	pub fn unpack_next(&self, unpacker: &mut Unpacker<'_>) -> Result<T> {
		if !unpacker.advance()? {
			return Err(PackError::EmptyOrUnstartedSource);
		}
		unpack_item(&*self.codec, unpacker)
	}

	/// Render the codec structure for debugging.
	pub fn dump(&self) -> String {
		let mut out = String::new();
		// Writing into a String cannot fail.
		let _ = self.codec.dump(&mut out, 0);
		out
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeMap;

	use objpack_testkit::hex;

	use super::Serializer;
	use crate::pack::{CodecRegistry, PackError, Unpacker};

	#[test]
	fn unpack_next_reads_consecutive_values() {
		let registry = CodecRegistry::default();
		let serializer = Serializer::<Vec<u8>>::new(&registry).expect("codec");

		let bytes = hex("92 01 02 90 91 ff");
		let mut unpacker = Unpacker::new(&bytes);
		assert_eq!(serializer.unpack_next(&mut unpacker).expect("first"), vec![1, 2]);
		assert_eq!(serializer.unpack_next(&mut unpacker).expect("second"), Vec::<u8>::new());
		assert!(matches!(serializer.unpack_next(&mut unpacker), Err(PackError::IntegerOutOfRange { .. })));
		assert!(matches!(serializer.unpack_next(&mut unpacker), Err(PackError::EmptyOrUnstartedSource)));
	}

	#[test]
	fn map_container_round_trips() {
		let registry = CodecRegistry::default();
		let serializer = Serializer::<BTreeMap<String, Option<bool>>>::new(&registry).expect("codec");

		let mut value = BTreeMap::new();
		value.insert("on".to_owned(), Some(true));
		value.insert("unset".to_owned(), None);

		let bytes = serializer.pack(&value).expect("pack");
		assert_eq!(serializer.unpack(&bytes).expect("unpack"), value);
		assert_eq!(serializer.dump(), "Map<String, Option<bool>>");
	}
}
