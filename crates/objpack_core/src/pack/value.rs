use std::sync::Arc;

use crate::pack::codec::next_token;
use crate::pack::token::Token;
use crate::pack::{CodecRegistry, PackCodec, PackError, Packable, Packer, Result, Unpacker, unpack_item};

/// Schema-less decoded value, mirroring the wire tokens one to one.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Nil marker.
	Nil,
	/// Boolean.
	Bool(bool),
	/// Negative integer, or one written with a signed marker.
	Int(i64),
	/// Non-negative integer.
	UInt(u64),
	/// Single-precision float.
	F32(f32),
	/// Double-precision float.
	F64(f64),
	/// UTF-8 string.
	Str(Box<str>),
	/// Raw binary payload.
	Bin(Vec<u8>),
	/// Application extension payload.
	Ext {
		/// Extension type code.
		kind: i8,
		/// Payload bytes.
		data: Vec<u8>,
	},
	/// Array of items.
	Array(Vec<Value>),
	/// Map entries in wire order.
	Map(Vec<(Value, Value)>),
}

impl Value {
	/// Look up a map entry by string key.
	pub fn get(&self, key: &str) -> Option<&Value> {
		let Self::Map(entries) = self else {
			return None;
		};
		entries
			.iter()
			.find(|(entry_key, _)| matches!(entry_key, Self::Str(name) if name.as_ref() == key))
			.map(|(_, value)| value)
	}

	/// Stable lowercase label of the value kind.
	pub fn kind_name(&self) -> &'static str {
		match self {
			Self::Nil => "nil",
			Self::Bool(_) => "bool",
			Self::Int(_) | Self::UInt(_) => "integer",
			Self::F32(_) | Self::F64(_) => "float",
			Self::Str(_) => "string",
			Self::Bin(_) => "binary",
			Self::Ext { .. } => "extension",
			Self::Array(_) => "array",
			Self::Map(_) => "map",
		}
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::Str(value.into())
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		if value >= 0 { Self::UInt(value as u64) } else { Self::Int(value) }
	}
}

/// Codec for [`Value`], accepting every token kind.
pub struct ValueCodec;

impl PackCodec<Value> for ValueCodec {
	fn pack(&self, packer: &mut Packer, value: &Value) -> Result<()> {
		match value {
			Value::Nil => packer.write_nil(),
			Value::Bool(v) => packer.write_bool(*v),
			Value::Int(v) => packer.write_i64(*v),
			Value::UInt(v) => packer.write_u64(*v),
			Value::F32(v) => packer.write_f32(*v),
			Value::F64(v) => packer.write_f64(*v),
			Value::Str(v) => packer.write_str(v)?,
			Value::Bin(v) => packer.write_bin(v)?,
			Value::Ext { kind, data } => packer.write_ext(*kind, data)?,
			Value::Array(items) => {
				packer.write_array_header(items.len())?;
				for item in items {
					self.pack(packer, item)?;
				}
			}
			Value::Map(entries) => {
				packer.write_map_header(entries.len())?;
				for (key, item) in entries {
					self.pack(packer, key)?;
					self.pack(packer, item)?;
				}
			}
		}
		Ok(())
	}

	fn unpack(&self, unpacker: &mut Unpacker<'_>) -> Result<Value> {
		let value = match unpacker.expect_current()? {
			Token::Nil => Value::Nil,
			Token::Bool(v) => Value::Bool(v),
			Token::Int(v) => Value::Int(v),
			Token::UInt(v) => Value::UInt(v),
			Token::F32(v) => Value::F32(v),
			Token::F64(v) => Value::F64(v),
			Token::Str(_) => Value::Str(unpacker.read_str()?.into()),
			Token::Bin(v) => Value::Bin(v.to_vec()),
			Token::Ext { kind, data } => Value::Ext { kind, data: data.to_vec() },
			Token::ArrayHeader(count) => {
				let mut items = Vec::with_capacity(count as usize);
				for _ in 0..count {
					next_token(unpacker)?;
					items.push(unpack_item(self, unpacker)?);
				}
				Value::Array(items)
			}
			Token::MapHeader(count) => {
				let mut entries = Vec::with_capacity(count as usize);
				for _ in 0..count {
					next_token(unpacker)?;
					let key = unpack_item(self, unpacker)?;
					next_token(unpacker)?;
					let item = unpack_item(self, unpacker)?;
					entries.push((key, item));
				}
				Value::Map(entries)
			}
		};
		Ok(value)
	}

	fn type_name(&self) -> &'static str {
		"Value"
	}
}

impl Packable for Value {
	fn build_codec(_registry: &CodecRegistry) -> Result<Arc<dyn PackCodec<Self>>> {
		Ok(Arc::new(ValueCodec))
	}

	fn nil_value() -> Option<Self> {
		Some(Value::Nil)
	}
}

/// Decode every remaining top-level value of a reader.
pub fn unpack_values(unpacker: &mut Unpacker<'_>) -> Result<Vec<Value>> {
	let mut values = Vec::new();
	while unpacker.advance()? {
		values.push(unpack_item(&ValueCodec, unpacker)?);
	}
	if values.is_empty() {
		return Err(PackError::EmptyOrUnstartedSource);
	}
	Ok(values)
}

#[cfg(test)]
mod tests {
	use super::{Value, ValueCodec, unpack_values};
	use crate::pack::{PackCodec, Packer, Unpacker};

	#[test]
	fn nested_document_survives_pack_and_unpack() {
		let value = Value::Map(vec![
			("name".into(), "sample".into()),
			("tags".into(), Value::Array(vec![Value::Bool(true), Value::Nil, Value::Int(-7)])),
			("blob".into(), Value::Bin(vec![0, 1, 2])),
		]);

		let mut packer = Packer::new();
		ValueCodec.pack(&mut packer, &value).expect("pack");
		let bytes = packer.into_inner();

		let mut unpacker = Unpacker::new(&bytes);
		let values = unpack_values(&mut unpacker).expect("unpack");
		assert_eq!(values, vec![value]);
	}

	#[test]
	fn get_finds_string_keys_only() {
		let value = Value::Map(vec![(Value::UInt(1), "one".into()), ("x".into(), Value::UInt(3))]);
		assert_eq!(value.get("x"), Some(&Value::UInt(3)));
		assert_eq!(value.get("1"), None);
		assert_eq!(Value::Nil.get("x"), None);
	}

	#[test]
	fn several_top_level_values_are_read_in_order() {
		let bytes = [0x01, 0xC3, 0x91, 0xC0];
		let mut unpacker = Unpacker::new(&bytes);
		let values = unpack_values(&mut unpacker).expect("unpack");
		assert_eq!(values, vec![Value::UInt(1), Value::Bool(true), Value::Array(vec![Value::Nil])]);
	}
}
