mod bytes;
mod codec;
mod collection;
mod compression;
mod error;
mod member;
mod null;
mod object;
mod options;
mod packer;
mod registry;
mod scalar;
mod serializer;
mod token;
mod unpacker;
mod value;

/// Codec trait and item helpers for nested values.
pub use codec::{PackCodec, unpack_item, unpack_item_to};
/// Builtin collection codecs.
pub use collection::{MapCodec, MapLike, OptionCodec, VecCodec};
/// Compression detection and zstd helpers.
pub use compression::{Compression, ZSTD_MAGIC, decode_bytes, encode_zstd};
/// Error and result aliases.
pub use error::{PackError, Result};
/// Member metadata.
pub use member::{MemberDescriptor, NilPolicy};
/// Placeholder codec for synthetic members.
pub use null::{NULL_CODEC, Nil, NullCodec};
/// Per-type object codec and its builder.
pub use object::{InstanceFactory, ObjectCodec, ObjectCodecBuilder};
/// Encoding method and decode limits.
pub use options::{PackOptions, SerializationMethod};
/// Token writer.
pub use packer::Packer;
/// Codec registry and the trait types implement to join it.
pub use registry::{CodecRegistry, Packable};
/// Builtin scalar codecs.
pub use scalar::{BoolCodec, F32Codec, F64Codec, IntCodec, StringCodec};
/// Byte-level facade over a resolved codec.
pub use serializer::Serializer;
/// Wire token model.
pub use token::Token;
/// Token reader and bounded sub-reader.
pub use unpacker::{Subtree, Unpacker};
/// Schema-less values.
pub use value::{Value, ValueCodec, unpack_values};
