use std::any::Any;
use std::sync::Arc;

use crate::pack::{CodecRegistry, PackCodec, PackError, Packable, Packer, Result, Unpacker};

/// Value of a member slot that exists only to keep ordinals aligned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Nil;

/// Placeholder codec for synthetic member slots.
///
/// Always writes nil and always decodes to [`Nil`]. It has no backing collection, so in-place
/// decoding is never supported.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCodec;

/// Shared placeholder codec instance.
pub static NULL_CODEC: NullCodec = NullCodec;

impl NullCodec {
	/// Decode into a type-erased target, checking it is a [`Nil`] first.
	pub fn unpack_to_any(&self, unpacker: &mut Unpacker<'_>, target: &mut dyn Any) -> Result<()> {
		let Some(nil) = target.downcast_mut::<Nil>() else {
			return Err(PackError::ArgumentTypeMismatch { expected: "Nil" });
		};
		self.unpack_to(unpacker, nil)
	}
}

impl PackCodec<Nil> for NullCodec {
	fn pack(&self, packer: &mut Packer, _value: &Nil) -> Result<()> {
		packer.write_nil();
		Ok(())
	}

	fn unpack(&self, unpacker: &mut Unpacker<'_>) -> Result<Nil> {
		unpacker.expect_current()?;
		Ok(Nil)
	}

	fn unpack_to(&self, _unpacker: &mut Unpacker<'_>, _collection: &mut Nil) -> Result<()> {
		Err(PackError::UnsupportedOperation {
			operation: "unpack_to on placeholder member",
		})
	}

	fn type_name(&self) -> &'static str {
		"nil"
	}
}

impl Packable for Nil {
	fn build_codec(_registry: &CodecRegistry) -> Result<Arc<dyn PackCodec<Self>>> {
		Ok(Arc::new(NullCodec))
	}

	fn nil_value() -> Option<Self> {
		Some(Nil)
	}
}

#[cfg(test)]
mod tests {
	use super::{NULL_CODEC, Nil};
	use crate::pack::{PackCodec, PackError, Packer, Unpacker};

	#[test]
	fn pack_always_writes_nil() {
		let mut packer = Packer::new();
		NULL_CODEC.pack(&mut packer, &Nil).expect("pack");
		assert_eq!(packer.as_bytes(), &[0xC0]);
	}

	#[test]
	fn unpack_accepts_any_positioned_value() {
		let bytes = [0x2A];
		let mut unpacker = Unpacker::new(&bytes);
		assert!(unpacker.advance().expect("token"));
		assert_eq!(NULL_CODEC.unpack(&mut unpacker).expect("unpack"), Nil);
	}

	#[test]
	fn unpack_before_first_token_is_rejected() {
		let bytes = [0xC0];
		let mut unpacker = Unpacker::new(&bytes);
		let err = NULL_CODEC.unpack(&mut unpacker).expect_err("not started");
		assert!(matches!(err, PackError::EmptyOrUnstartedSource));
	}

	#[test]
	fn unpack_to_is_unsupported() {
		let bytes = [0x90];
		let mut unpacker = Unpacker::new(&bytes);
		assert!(unpacker.advance().expect("token"));

		let mut nil = Nil;
		let err = NULL_CODEC.unpack_to_any(&mut unpacker, &mut nil).expect_err("no backing collection");
		assert!(matches!(err, PackError::UnsupportedOperation { .. }));

		let mut wrong = Vec::<i32>::new();
		let err = NULL_CODEC.unpack_to_any(&mut unpacker, &mut wrong).expect_err("wrong target");
		assert!(matches!(err, PackError::ArgumentTypeMismatch { expected: "Nil" }));
	}
}
