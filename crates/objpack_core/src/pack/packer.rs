use crate::pack::token::{
	ARRAY16, ARRAY32, BIN8, BIN16, BIN32, EXT8, EXT16, EXT32, FALSE, FLOAT32, FLOAT64, INT8, INT16, INT32, INT64, MAP16, MAP32, NIL, STR8, STR16, STR32, TRUE,
	UINT8, UINT16, UINT32, UINT64,
};
use crate::pack::{PackError, Result};

/// Token-level writer appending to an owned byte buffer.
///
/// Integers are always written in their smallest encoding.
#[derive(Debug, Default)]
pub struct Packer {
	buf: Vec<u8>,
}

impl Packer {
	/// Create an empty writer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Bytes written so far.
	pub fn as_bytes(&self) -> &[u8] {
		&self.buf
	}

	/// Consume the writer and return its buffer.
	pub fn into_inner(self) -> Vec<u8> {
		self.buf
	}

	/// Write `nil`.
	pub fn write_nil(&mut self) {
		self.buf.push(NIL);
	}

	/// Write a boolean.
	pub fn write_bool(&mut self, value: bool) {
		self.buf.push(if value { TRUE } else { FALSE });
	}

	/// Write a non-negative integer.
	pub fn write_u64(&mut self, value: u64) {
		if value < 0x80 {
			self.buf.push(value as u8);
		} else if value <= u64::from(u8::MAX) {
			self.buf.push(UINT8);
			self.buf.push(value as u8);
		} else if value <= u64::from(u16::MAX) {
			self.buf.push(UINT16);
			self.buf.extend_from_slice(&(value as u16).to_be_bytes());
		} else if value <= u64::from(u32::MAX) {
			self.buf.push(UINT32);
			self.buf.extend_from_slice(&(value as u32).to_be_bytes());
		} else {
			self.buf.push(UINT64);
			self.buf.extend_from_slice(&value.to_be_bytes());
		}
	}

	/// Write a signed integer.
	pub fn write_i64(&mut self, value: i64) {
		if value >= 0 {
			self.write_u64(value as u64);
		} else if value >= -32 {
			self.buf.push(value as i8 as u8);
		} else if value >= i64::from(i8::MIN) {
			self.buf.push(INT8);
			self.buf.push(value as i8 as u8);
		} else if value >= i64::from(i16::MIN) {
			self.buf.push(INT16);
			self.buf.extend_from_slice(&(value as i16).to_be_bytes());
		} else if value >= i64::from(i32::MIN) {
			self.buf.push(INT32);
			self.buf.extend_from_slice(&(value as i32).to_be_bytes());
		} else {
			self.buf.push(INT64);
			self.buf.extend_from_slice(&value.to_be_bytes());
		}
	}

	/// Write a single precision float.
	pub fn write_f32(&mut self, value: f32) {
		self.buf.push(FLOAT32);
		self.buf.extend_from_slice(&value.to_bits().to_be_bytes());
	}

	/// Write a double precision float.
	pub fn write_f64(&mut self, value: f64) {
		self.buf.push(FLOAT64);
		self.buf.extend_from_slice(&value.to_bits().to_be_bytes());
	}

	/// Write a UTF-8 string.
	pub fn write_str(&mut self, value: &str) -> Result<()> {
		let len = value.len();
		if len < 32 {
			self.buf.push(0xA0 | len as u8);
		} else if len <= usize::from(u8::MAX) {
			self.buf.push(STR8);
			self.buf.push(len as u8);
		} else if len <= usize::from(u16::MAX) {
			self.buf.push(STR16);
			self.buf.extend_from_slice(&(len as u16).to_be_bytes());
		} else {
			self.buf.push(STR32);
			self.buf.extend_from_slice(&len32(len)?.to_be_bytes());
		}
		self.buf.extend_from_slice(value.as_bytes());
		Ok(())
	}

	/// Write a binary payload.
	pub fn write_bin(&mut self, value: &[u8]) -> Result<()> {
		let len = value.len();
		if len <= usize::from(u8::MAX) {
			self.buf.push(BIN8);
			self.buf.push(len as u8);
		} else if len <= usize::from(u16::MAX) {
			self.buf.push(BIN16);
			self.buf.extend_from_slice(&(len as u16).to_be_bytes());
		} else {
			self.buf.push(BIN32);
			self.buf.extend_from_slice(&len32(len)?.to_be_bytes());
		}
		self.buf.extend_from_slice(value);
		Ok(())
	}

	/// Write an extension payload.
	pub fn write_ext(&mut self, kind: i8, data: &[u8]) -> Result<()> {
		let len = data.len();
		if len <= usize::from(u8::MAX) {
			self.buf.push(EXT8);
			self.buf.push(len as u8);
		} else if len <= usize::from(u16::MAX) {
			self.buf.push(EXT16);
			self.buf.extend_from_slice(&(len as u16).to_be_bytes());
		} else {
			self.buf.push(EXT32);
			self.buf.extend_from_slice(&len32(len)?.to_be_bytes());
		}
		self.buf.push(kind as u8);
		self.buf.extend_from_slice(data);
		Ok(())
	}

	/// Write an array header; exactly `len` values must follow.
	pub fn write_array_header(&mut self, len: usize) -> Result<()> {
		if len < 16 {
			self.buf.push(0x90 | len as u8);
		} else if len <= usize::from(u16::MAX) {
			self.buf.push(ARRAY16);
			self.buf.extend_from_slice(&(len as u16).to_be_bytes());
		} else {
			self.buf.push(ARRAY32);
			self.buf.extend_from_slice(&len32(len)?.to_be_bytes());
		}
		Ok(())
	}

	/// Write a map header; exactly `len` key/value pairs must follow.
	pub fn write_map_header(&mut self, len: usize) -> Result<()> {
		if len < 16 {
			self.buf.push(0x80 | len as u8);
		} else if len <= usize::from(u16::MAX) {
			self.buf.push(MAP16);
			self.buf.extend_from_slice(&(len as u16).to_be_bytes());
		} else {
			self.buf.push(MAP32);
			self.buf.extend_from_slice(&len32(len)?.to_be_bytes());
		}
		Ok(())
	}
}

fn len32(len: usize) -> Result<u32> {
	u32::try_from(len).map_err(|_| PackError::CollectionTooLarge {
		count: len,
		max: u32::MAX as usize,
	})
}
