use crate::pack::bytes::Cursor;
use crate::pack::{PackError, Result};

pub(crate) const NIL: u8 = 0xC0;
pub(crate) const FALSE: u8 = 0xC2;
pub(crate) const TRUE: u8 = 0xC3;
pub(crate) const BIN8: u8 = 0xC4;
pub(crate) const BIN16: u8 = 0xC5;
pub(crate) const BIN32: u8 = 0xC6;
pub(crate) const EXT8: u8 = 0xC7;
pub(crate) const EXT16: u8 = 0xC8;
pub(crate) const EXT32: u8 = 0xC9;
pub(crate) const FLOAT32: u8 = 0xCA;
pub(crate) const FLOAT64: u8 = 0xCB;
pub(crate) const UINT8: u8 = 0xCC;
pub(crate) const UINT16: u8 = 0xCD;
pub(crate) const UINT32: u8 = 0xCE;
pub(crate) const UINT64: u8 = 0xCF;
pub(crate) const INT8: u8 = 0xD0;
pub(crate) const INT16: u8 = 0xD1;
pub(crate) const INT32: u8 = 0xD2;
pub(crate) const INT64: u8 = 0xD3;
pub(crate) const FIXEXT1: u8 = 0xD4;
pub(crate) const FIXEXT16: u8 = 0xD8;
pub(crate) const STR8: u8 = 0xD9;
pub(crate) const STR16: u8 = 0xDA;
pub(crate) const STR32: u8 = 0xDB;
pub(crate) const ARRAY16: u8 = 0xDC;
pub(crate) const ARRAY32: u8 = 0xDD;
pub(crate) const MAP16: u8 = 0xDE;
pub(crate) const MAP32: u8 = 0xDF;

/// One wire primitive as seen by the reader.
///
/// Collection headers carry only their declared item count; the items follow as separate tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token<'a> {
	/// `nil`.
	Nil,
	/// `true` / `false`.
	Bool(bool),
	/// Integer written with a signed marker.
	Int(i64),
	/// Non-negative integer.
	UInt(u64),
	/// Single precision float.
	F32(f32),
	/// Double precision float.
	F64(f64),
	/// Raw string payload (UTF-8 checked on access).
	Str(&'a [u8]),
	/// Binary payload.
	Bin(&'a [u8]),
	/// Extension payload.
	Ext {
		/// Application-defined type tag.
		kind: i8,
		/// Payload bytes.
		data: &'a [u8],
	},
	/// Array header with declared element count.
	ArrayHeader(u32),
	/// Map header with declared entry count.
	MapHeader(u32),
}

impl Token<'_> {
	/// Stable lowercase label for diagnostics.
	pub fn kind_name(&self) -> &'static str {
		match self {
			Self::Nil => "nil",
			Self::Bool(_) => "bool",
			Self::Int(_) | Self::UInt(_) => "integer",
			Self::F32(_) | Self::F64(_) => "float",
			Self::Str(_) => "string",
			Self::Bin(_) => "binary",
			Self::Ext { .. } => "extension",
			Self::ArrayHeader(_) => "array",
			Self::MapHeader(_) => "map",
		}
	}

	/// Number of tokens directly nested below a header (`0` for scalars).
	pub(crate) fn child_tokens(&self) -> u64 {
		match self {
			Self::ArrayHeader(count) => u64::from(*count),
			Self::MapHeader(count) => u64::from(*count) * 2,
			_ => 0,
		}
	}
}

/// Read one token starting at the cursor position.
pub(crate) fn read_token<'a>(cursor: &mut Cursor<'a>) -> Result<Token<'a>> {
	let at = cursor.pos();
	let marker = cursor.read_u8()?;

	let token = match marker {
		0x00..=0x7F => Token::UInt(u64::from(marker)),
		0x80..=0x8F => Token::MapHeader(u32::from(marker & 0x0F)),
		0x90..=0x9F => Token::ArrayHeader(u32::from(marker & 0x0F)),
		0xA0..=0xBF => Token::Str(cursor.read_exact(usize::from(marker & 0x1F))?),
		NIL => Token::Nil,
		FALSE => Token::Bool(false),
		TRUE => Token::Bool(true),
		BIN8 => {
			let len = usize::from(cursor.read_u8()?);
			Token::Bin(cursor.read_exact(len)?)
		}
		BIN16 => {
			let len = usize::from(cursor.read_u16()?);
			Token::Bin(cursor.read_exact(len)?)
		}
		BIN32 => {
			let len = cursor.read_u32()? as usize;
			Token::Bin(cursor.read_exact(len)?)
		}
		EXT8 | EXT16 | EXT32 => {
			let len = match marker {
				EXT8 => usize::from(cursor.read_u8()?),
				EXT16 => usize::from(cursor.read_u16()?),
				_ => cursor.read_u32()? as usize,
			};
			let kind = cursor.read_u8()? as i8;
			Token::Ext {
				kind,
				data: cursor.read_exact(len)?,
			}
		}
		FLOAT32 => Token::F32(f32::from_bits(cursor.read_u32()?)),
		FLOAT64 => Token::F64(f64::from_bits(cursor.read_u64()?)),
		UINT8 => Token::UInt(u64::from(cursor.read_u8()?)),
		UINT16 => Token::UInt(u64::from(cursor.read_u16()?)),
		UINT32 => Token::UInt(u64::from(cursor.read_u32()?)),
		UINT64 => Token::UInt(cursor.read_u64()?),
		INT8 => Token::Int(i64::from(cursor.read_u8()? as i8)),
		INT16 => Token::Int(i64::from(cursor.read_u16()? as i16)),
		INT32 => Token::Int(i64::from(cursor.read_u32()? as i32)),
		INT64 => Token::Int(cursor.read_u64()? as i64),
		FIXEXT1..=FIXEXT16 => {
			let len = 1_usize << (marker - FIXEXT1);
			let kind = cursor.read_u8()? as i8;
			Token::Ext {
				kind,
				data: cursor.read_exact(len)?,
			}
		}
		STR8 => {
			let len = usize::from(cursor.read_u8()?);
			Token::Str(cursor.read_exact(len)?)
		}
		STR16 => {
			let len = usize::from(cursor.read_u16()?);
			Token::Str(cursor.read_exact(len)?)
		}
		STR32 => {
			let len = cursor.read_u32()? as usize;
			Token::Str(cursor.read_exact(len)?)
		}
		ARRAY16 => Token::ArrayHeader(u32::from(cursor.read_u16()?)),
		ARRAY32 => Token::ArrayHeader(cursor.read_u32()?),
		MAP16 => Token::MapHeader(u32::from(cursor.read_u16()?)),
		MAP32 => Token::MapHeader(cursor.read_u32()?),
		0xE0..=0xFF => Token::Int(i64::from(marker as i8)),
		0xC1 => {
			return Err(PackError::InvalidStreamFormat {
				at,
				reason: "reserved marker 0xc1",
			});
		}
	};

	Ok(token)
}
