use serde::Deserialize;

/// Wire shape used when encoding objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializationMethod {
	/// Positional: one array element per member slot.
	#[default]
	Array,
	/// Named: one map entry per real member, keyed by wire name.
	Map,
}

impl SerializationMethod {
	/// Render the method as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Array => "array",
			Self::Map => "map",
		}
	}
}

/// Encoding choices and decoding safety limits shared by a registry and its readers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PackOptions {
	/// Shape written by object encoders. Decoding always accepts both.
	pub method: SerializationMethod,
	/// Maximum nesting depth of bounded sub-readers.
	pub max_depth: u32,
	/// Maximum declared item count of a single array or map header.
	pub max_collection_len: usize,
}

impl Default for PackOptions {
	fn default() -> Self {
		Self {
			method: SerializationMethod::Array,
			max_depth: 64,
			max_collection_len: 1 << 20,
		}
	}
}

impl PackOptions {
	/// Preset that encodes objects as maps, for consumers that key by name.
	pub fn named() -> Self {
		Self {
			method: SerializationMethod::Map,
			..Self::default()
		}
	}

	/// Preset with tight limits for inspecting untrusted input.
	pub fn for_inspect() -> Self {
		Self {
			method: SerializationMethod::Array,
			max_depth: 16,
			max_collection_len: 4096,
		}
	}
}
