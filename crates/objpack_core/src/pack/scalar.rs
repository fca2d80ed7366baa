use std::marker::PhantomData;
use std::sync::Arc;

use crate::pack::{CodecRegistry, PackCodec, PackError, Packable, Packer, Result, Unpacker};

/// Codec for fixed-width integers, range-checked on decode.
pub struct IntCodec<T> {
	_marker: PhantomData<fn() -> T>,
}

impl<T> IntCodec<T> {
	/// Create the codec.
	pub fn new() -> Self {
		Self { _marker: PhantomData }
	}
}

impl<T> Default for IntCodec<T> {
	fn default() -> Self {
		Self::new()
	}
}

macro_rules! signed_codec {
	($($ty:ty),* $(,)?) => {
		$(
			impl PackCodec<$ty> for IntCodec<$ty> {
				fn pack(&self, packer: &mut Packer, value: &$ty) -> Result<()> {
					packer.write_i64(i64::from(*value));
					Ok(())
				}

				fn unpack(&self, unpacker: &mut Unpacker<'_>) -> Result<$ty> {
					let raw = unpacker.read_i64().map_err(|err| retarget(err, stringify!($ty)))?;
					<$ty>::try_from(raw).map_err(|_| PackError::IntegerOutOfRange {
						value: raw.to_string(),
						target: stringify!($ty),
					})
				}

				fn type_name(&self) -> &'static str {
					stringify!($ty)
				}
			}

			impl Packable for $ty {
				fn build_codec(_registry: &CodecRegistry) -> Result<Arc<dyn PackCodec<Self>>> {
					Ok(Arc::new(IntCodec::<$ty>::new()))
				}
			}
		)*
	};
}

macro_rules! unsigned_codec {
	($($ty:ty),* $(,)?) => {
		$(
			impl PackCodec<$ty> for IntCodec<$ty> {
				fn pack(&self, packer: &mut Packer, value: &$ty) -> Result<()> {
					packer.write_u64(u64::from(*value));
					Ok(())
				}

				fn unpack(&self, unpacker: &mut Unpacker<'_>) -> Result<$ty> {
					let raw = unpacker.read_u64().map_err(|err| retarget(err, stringify!($ty)))?;
					<$ty>::try_from(raw).map_err(|_| PackError::IntegerOutOfRange {
						value: raw.to_string(),
						target: stringify!($ty),
					})
				}

				fn type_name(&self) -> &'static str {
					stringify!($ty)
				}
			}

			impl Packable for $ty {
				fn build_codec(_registry: &CodecRegistry) -> Result<Arc<dyn PackCodec<Self>>> {
					Ok(Arc::new(IntCodec::<$ty>::new()))
				}
			}
		)*
	};
}

/// Report a range failure from the wide reader against the narrower target type.
fn retarget(err: PackError, target: &'static str) -> PackError {
	match err {
		PackError::IntegerOutOfRange { value, .. } => PackError::IntegerOutOfRange { value, target },
		other => other,
	}
}

signed_codec!(i8, i16, i32, i64);
unsigned_codec!(u8, u16, u32, u64);

/// Codec for `f32`. Doubles are narrowed on decode.
pub struct F32Codec;

impl PackCodec<f32> for F32Codec {
	fn pack(&self, packer: &mut Packer, value: &f32) -> Result<()> {
		packer.write_f32(*value);
		Ok(())
	}

	fn unpack(&self, unpacker: &mut Unpacker<'_>) -> Result<f32> {
		Ok(unpacker.read_f64()? as f32)
	}

	fn type_name(&self) -> &'static str {
		"f32"
	}
}

impl Packable for f32 {
	fn build_codec(_registry: &CodecRegistry) -> Result<Arc<dyn PackCodec<Self>>> {
		Ok(Arc::new(F32Codec))
	}
}

/// Codec for `f64`.
pub struct F64Codec;

impl PackCodec<f64> for F64Codec {
	fn pack(&self, packer: &mut Packer, value: &f64) -> Result<()> {
		packer.write_f64(*value);
		Ok(())
	}

	fn unpack(&self, unpacker: &mut Unpacker<'_>) -> Result<f64> {
		unpacker.read_f64()
	}

	fn type_name(&self) -> &'static str {
		"f64"
	}
}

impl Packable for f64 {
	fn build_codec(_registry: &CodecRegistry) -> Result<Arc<dyn PackCodec<Self>>> {
		Ok(Arc::new(F64Codec))
	}
}

/// Codec for `bool`.
pub struct BoolCodec;

impl PackCodec<bool> for BoolCodec {
	fn pack(&self, packer: &mut Packer, value: &bool) -> Result<()> {
		packer.write_bool(*value);
		Ok(())
	}

	fn unpack(&self, unpacker: &mut Unpacker<'_>) -> Result<bool> {
		unpacker.read_bool()
	}

	fn type_name(&self) -> &'static str {
		"bool"
	}
}

impl Packable for bool {
	fn build_codec(_registry: &CodecRegistry) -> Result<Arc<dyn PackCodec<Self>>> {
		Ok(Arc::new(BoolCodec))
	}
}

/// Codec for owned UTF-8 strings.
pub struct StringCodec;

impl PackCodec<String> for StringCodec {
	fn pack(&self, packer: &mut Packer, value: &String) -> Result<()> {
		packer.write_str(value)
	}

	fn unpack(&self, unpacker: &mut Unpacker<'_>) -> Result<String> {
		Ok(unpacker.read_str()?.to_owned())
	}

	fn type_name(&self) -> &'static str {
		"String"
	}
}

impl Packable for String {
	fn build_codec(_registry: &CodecRegistry) -> Result<Arc<dyn PackCodec<Self>>> {
		Ok(Arc::new(StringCodec))
	}
}
