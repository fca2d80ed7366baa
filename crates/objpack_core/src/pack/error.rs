use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, PackError>;

/// Errors produced while building codecs and packing or unpacking streams.
#[derive(Debug, Error)]
pub enum PackError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Target type has no instance factory.
	#[error("type {type_name} has no default constructor")]
	NoDefaultConstructor {
		/// Target type name.
		type_name: &'static str,
	},
	/// A get-only member is not an appendable collection.
	#[error("member {member} of {type_name} has no setter and is not an appendable collection")]
	InvalidMemberMapping {
		/// Declaring type name.
		type_name: &'static str,
		/// Offending member name.
		member: Box<str>,
	},
	/// Two members share one wire name.
	#[error("duplicate member name {member} on {type_name}")]
	DuplicateMemberName {
		/// Declaring type name.
		type_name: &'static str,
		/// Repeated wire name.
		member: Box<str>,
	},
	/// A nil policy was given with no member to attach it to.
	#[error("nil policy on {type_name} does not follow a member")]
	NilPolicyWithoutMember {
		/// Declaring type name.
		type_name: &'static str,
	},
	/// A deferred self-reference outlived the codec it points at.
	#[error("codec for {type_name} was released before use")]
	DetachedCodec {
		/// Type whose codec is no longer alive.
		type_name: &'static str,
	},
	/// Array-shaped object had the wrong number of elements.
	#[error("unexpected array length: expected {expected}, actual {actual}")]
	UnexpectedArrayLength {
		/// Member count of the target type.
		expected: usize,
		/// Element count declared by the stream.
		actual: usize,
	},
	/// Stream ended before the current value was complete.
	#[error("unexpected end of stream at offset {at}")]
	UnexpectedEndOfStream {
		/// Byte offset where more data was needed.
		at: usize,
	},
	/// Stream content does not follow the expected format.
	#[error("invalid stream format at offset {at}: {reason}")]
	InvalidStreamFormat {
		/// Byte offset of the offending token.
		at: usize,
		/// Human-readable description.
		reason: &'static str,
	},
	/// Scalar codec found a token of the wrong kind.
	#[error("unexpected token at offset {at}: expected {expected}, got {got}")]
	UnexpectedToken {
		/// Byte offset of the token.
		at: usize,
		/// Expected token kind.
		expected: &'static str,
		/// Actual token kind.
		got: &'static str,
	},
	/// Integer token does not fit the target type.
	#[error("integer {value} out of range for {target}")]
	IntegerOutOfRange {
		/// Decoded value rendered as text.
		value: String,
		/// Target Rust type.
		target: &'static str,
	},
	/// String token is not valid UTF-8.
	#[error("invalid utf-8 string at offset {at}")]
	InvalidUtf8 {
		/// Byte offset of the string payload.
		at: usize,
	},
	/// Nil found for a member whose nil policy prohibits it.
	#[error("member {member} does not allow nil")]
	NullProhibited {
		/// Offending member name.
		member: Box<str>,
	},
	/// Nil found for a get-only collection member.
	#[error("read-only member {member} cannot be replaced with nil")]
	ReadOnlyMemberItemsMustNotBeNull {
		/// Offending member name.
		member: Box<str>,
	},
	/// Nil assigned to a member whose type has no nil value.
	#[error("member {member} of {declaring_type} has type {value_type} which cannot be nil")]
	ValueTypeCannotBeNull {
		/// Offending member name.
		member: Box<str>,
		/// Declared member type.
		value_type: &'static str,
		/// Declaring type.
		declaring_type: &'static str,
	},
	/// Decode attempted while the reader is not positioned on a value.
	#[error("source is empty or not started")]
	EmptyOrUnstartedSource,
	/// Codec cannot perform the requested operation.
	#[error("unsupported operation: {operation}")]
	UnsupportedOperation {
		/// Name of the rejected operation.
		operation: &'static str,
	},
	/// Supplied argument has an incompatible type.
	#[error("argument type mismatch: expected {expected}")]
	ArgumentTypeMismatch {
		/// Type the codec accepts.
		expected: &'static str,
	},
	/// Nested composite values exceeded configured depth.
	#[error("nesting depth exceeded (max={max_depth})")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Collection header declared more items than allowed.
	#[error("collection too large: count={count}, max={max}")]
	CollectionTooLarge {
		/// Declared item count.
		count: usize,
		/// Configured ceiling.
		max: usize,
	},
	/// Decompression output exceeded configured safety limit.
	#[error("decompressed output exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},
}

impl PackError {
	/// Whether the error points at a type mapping or schema mismatch rather than a damaged stream.
	///
	/// Schema errors are deterministic; feeding the same codec a fresh copy of the stream fails again.
	pub fn is_schema_error(&self) -> bool {
		matches!(
			self,
			Self::NoDefaultConstructor { .. }
				| Self::InvalidMemberMapping { .. }
				| Self::DuplicateMemberName { .. }
				| Self::NilPolicyWithoutMember { .. }
				| Self::DetachedCodec { .. }
				| Self::UnexpectedArrayLength { .. }
				| Self::NullProhibited { .. }
				| Self::ReadOnlyMemberItemsMustNotBeNull { .. }
				| Self::ValueTypeCannotBeNull { .. }
				| Self::UnsupportedOperation { .. }
				| Self::ArgumentTypeMismatch { .. }
		)
	}
}
