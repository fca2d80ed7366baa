use std::ops::{Deref, DerefMut};

use crate::pack::bytes::Cursor;
use crate::pack::token::{self, Token};
use crate::pack::{PackError, PackOptions, Result};

/// Token-level reader over a packed byte slice.
///
/// The reader walks the stream one token at a time: after [`Unpacker::advance`] lands on an
/// array or map header, the following `advance` calls return that collection's items. Codecs that
/// want to consume exactly one composite value open a [`Subtree`] instead.
#[derive(Debug)]
pub struct Unpacker<'a> {
	cursor: Cursor<'a>,
	current: Option<Token<'a>>,
	token_at: usize,
	depth: u32,
	max_depth: u32,
	max_collection_len: usize,
}

impl<'a> Unpacker<'a> {
	/// Create a reader with default limits. No token is current until the first `advance`.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self::with_options(bytes, &PackOptions::default())
	}

	/// Create a reader with limits taken from `options`.
	pub fn with_options(bytes: &'a [u8], options: &PackOptions) -> Self {
		Self {
			cursor: Cursor::new(bytes),
			current: None,
			token_at: 0,
			depth: 0,
			max_depth: options.max_depth,
			max_collection_len: options.max_collection_len,
		}
	}

	/// Read the next token. Returns `false` once no bytes remain.
	pub fn advance(&mut self) -> Result<bool> {
		if self.cursor.remaining() == 0 {
			self.current = None;
			self.token_at = self.cursor.pos();
			return Ok(false);
		}

		self.token_at = self.cursor.pos();
		let token = token::read_token(&mut self.cursor)?;
		if let Token::ArrayHeader(count) | Token::MapHeader(count) = token {
			let count = count as usize;
			if count > self.max_collection_len {
				return Err(PackError::CollectionTooLarge {
					count,
					max: self.max_collection_len,
				});
			}
		}
		self.current = Some(token);
		Ok(true)
	}

	/// Current token, if the reader is positioned on one.
	pub fn current(&self) -> Option<Token<'a>> {
		self.current
	}

	/// Byte offset of the current token.
	pub fn position(&self) -> usize {
		self.token_at
	}

	/// Whether any unread bytes remain in this reader's range.
	pub fn has_remaining(&self) -> bool {
		self.cursor.remaining() > 0
	}

	/// Nesting depth of this reader (`0` for the root).
	pub fn depth(&self) -> u32 {
		self.depth
	}

	/// Whether the current token is `nil`.
	pub fn is_nil(&self) -> bool {
		matches!(self.current, Some(Token::Nil))
	}

	/// Whether the current token is an array header.
	pub fn is_array_header(&self) -> bool {
		matches!(self.current, Some(Token::ArrayHeader(_)))
	}

	/// Whether the current token is a map header.
	pub fn is_map_header(&self) -> bool {
		matches!(self.current, Some(Token::MapHeader(_)))
	}

	/// Whether the current token starts a composite value.
	pub fn is_collection_header(&self) -> bool {
		self.is_array_header() || self.is_map_header()
	}

	/// Declared item count of the current array or map header.
	pub fn item_count(&self) -> Option<u32> {
		match self.current {
			Some(Token::ArrayHeader(count) | Token::MapHeader(count)) => Some(count),
			_ => None,
		}
	}

	/// Current token, or `EmptyOrUnstartedSource` if there is none.
	pub fn expect_current(&self) -> Result<Token<'a>> {
		self.current.ok_or(PackError::EmptyOrUnstartedSource)
	}

	/// Decode the current token as a UTF-8 string.
	pub fn read_str(&self) -> Result<&'a str> {
		match self.expect_current()? {
			Token::Str(bytes) => std::str::from_utf8(bytes).map_err(|_| PackError::InvalidUtf8 { at: self.token_at }),
			other => Err(self.unexpected("string", other)),
		}
	}

	/// Decode the current token as a boolean.
	pub fn read_bool(&self) -> Result<bool> {
		match self.expect_current()? {
			Token::Bool(value) => Ok(value),
			other => Err(self.unexpected("bool", other)),
		}
	}

	/// Decode the current token as a signed integer.
	pub fn read_i64(&self) -> Result<i64> {
		match self.expect_current()? {
			Token::Int(value) => Ok(value),
			Token::UInt(value) => i64::try_from(value).map_err(|_| PackError::IntegerOutOfRange {
				value: value.to_string(),
				target: "i64",
			}),
			other => Err(self.unexpected("integer", other)),
		}
	}

	/// Decode the current token as an unsigned integer.
	pub fn read_u64(&self) -> Result<u64> {
		match self.expect_current()? {
			Token::UInt(value) => Ok(value),
			Token::Int(value) => u64::try_from(value).map_err(|_| PackError::IntegerOutOfRange {
				value: value.to_string(),
				target: "u64",
			}),
			other => Err(self.unexpected("integer", other)),
		}
	}

	/// Decode the current token as a double, widening integers and single floats.
	pub fn read_f64(&self) -> Result<f64> {
		match self.expect_current()? {
			Token::F64(value) => Ok(value),
			Token::F32(value) => Ok(f64::from(value)),
			Token::Int(value) => Ok(value as f64),
			Token::UInt(value) => Ok(value as f64),
			other => Err(self.unexpected("float", other)),
		}
	}

	/// Decode the current token as a binary payload.
	pub fn read_bin(&self) -> Result<&'a [u8]> {
		match self.expect_current()? {
			Token::Bin(bytes) => Ok(bytes),
			other => Err(self.unexpected("binary", other)),
		}
	}

	/// Open a reader scoped to exactly the composite value whose header is current.
	///
	/// The returned guard starts positioned on the header. Dropping it moves this reader past the
	/// whole value, whether or not the nested decode consumed every item.
	pub fn read_subtree(&mut self) -> Result<Subtree<'_, 'a>> {
		let header = self.expect_current()?;
		if !matches!(header, Token::ArrayHeader(_) | Token::MapHeader(_)) {
			return Err(PackError::InvalidStreamFormat {
				at: self.token_at,
				reason: "subtree requested on a scalar token",
			});
		}

		let depth = self.depth + 1;
		if depth > self.max_depth {
			return Err(PackError::DepthExceeded { max_depth: self.max_depth });
		}

		let start = self.cursor.pos();
		let end = self.items_end(header)?;

		log::trace!("subtree {} at {}..{} depth={depth}", header.kind_name(), self.token_at, end);

		let inner = Unpacker {
			cursor: Cursor::at(&self.cursor.bytes()[..end], start),
			current: Some(header),
			token_at: self.token_at,
			depth,
			max_depth: self.max_depth,
			max_collection_len: self.max_collection_len,
		};

		Ok(Subtree { parent: self, inner, end })
	}

	/// Consume the current value, including every item of a composite value.
	pub fn skip_value(&mut self) -> Result<()> {
		let header = self.expect_current()?;
		let end = self.items_end(header)?;
		self.cursor.seek(end);
		Ok(())
	}

	fn items_end(&self, header: Token<'_>) -> Result<usize> {
		let mut scan = self.cursor.clone();
		let mut pending = header.child_tokens();
		while pending > 0 {
			let item = token::read_token(&mut scan)?;
			pending = pending - 1 + item.child_tokens();
		}
		Ok(scan.pos())
	}

	pub(crate) fn unexpected(&self, expected: &'static str, got: Token<'_>) -> PackError {
		PackError::UnexpectedToken {
			at: self.token_at,
			expected,
			got: got.kind_name(),
		}
	}
}

/// Reader bounded to one composite value of its parent.
///
/// Dereferences to [`Unpacker`]. On drop the parent reader is repositioned just past the value.
#[derive(Debug)]
pub struct Subtree<'p, 'a> {
	parent: &'p mut Unpacker<'a>,
	inner: Unpacker<'a>,
	end: usize,
}

impl<'a> Deref for Subtree<'_, 'a> {
	type Target = Unpacker<'a>;

	fn deref(&self) -> &Self::Target {
		&self.inner
	}
}

impl DerefMut for Subtree<'_, '_> {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.inner
	}
}

impl Drop for Subtree<'_, '_> {
	fn drop(&mut self) {
		self.parent.cursor.seek(self.end);
	}
}

#[cfg(test)]
mod tests;
