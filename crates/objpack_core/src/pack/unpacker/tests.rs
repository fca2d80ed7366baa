use objpack_testkit::hex;

use super::Unpacker;
use crate::pack::{PackError, PackOptions, Token};

fn limited(max_depth: u32, max_collection_len: usize) -> PackOptions {
	PackOptions {
		max_depth,
		max_collection_len,
		..PackOptions::default()
	}
}

#[test]
fn advance_walks_tokens_and_reports_end() {
	let bytes = hex("92 01 a1 61");
	let mut unpacker = Unpacker::new(&bytes);
	assert!(unpacker.current().is_none());

	assert!(unpacker.advance().expect("header"));
	assert_eq!(unpacker.item_count(), Some(2));
	assert!(unpacker.advance().expect("first"));
	assert_eq!(unpacker.read_u64().expect("uint"), 1);
	assert!(unpacker.advance().expect("second"));
	assert_eq!(unpacker.position(), 2);
	assert_eq!(unpacker.read_str().expect("str"), "a");
	assert!(!unpacker.advance().expect("end"));
	assert!(unpacker.current().is_none());
}

#[test]
fn reading_before_advance_is_unstarted() {
	let bytes = hex("c0");
	let unpacker = Unpacker::new(&bytes);
	assert!(matches!(unpacker.expect_current(), Err(PackError::EmptyOrUnstartedSource)));
}

#[test]
fn dropped_subtree_moves_parent_past_value() {
	// [[1], 2] 5
	let bytes = hex("92 91 01 02 05");
	let mut unpacker = Unpacker::new(&bytes);
	assert!(unpacker.advance().expect("outer"));
	assert!(unpacker.advance().expect("inner header"));
	{
		let subtree = unpacker.read_subtree().expect("subtree");
		assert_eq!(subtree.depth(), 1);
		assert!(subtree.is_array_header());
	}
	assert!(unpacker.advance().expect("after subtree"));
	assert_eq!(unpacker.current(), Some(Token::UInt(2)));
	assert!(unpacker.advance().expect("trailing"));
	assert_eq!(unpacker.current(), Some(Token::UInt(5)));
}

#[test]
fn parent_is_repositioned_after_failed_nested_read() {
	// {"x": true, "y": 4} 42
	let bytes = hex("82 a1 78 c3 a1 79 04 2a");
	let mut unpacker = Unpacker::new(&bytes);
	assert!(unpacker.advance().expect("map"));
	{
		let mut subtree = unpacker.read_subtree().expect("subtree");
		assert!(subtree.advance().expect("key"));
		assert!(subtree.advance().expect("value"));
		let err = subtree.read_i64().expect_err("bool is not an integer");
		assert!(matches!(err, PackError::UnexpectedToken { expected: "integer", got: "bool", .. }));
	}
	assert!(unpacker.advance().expect("after subtree"));
	assert_eq!(unpacker.read_u64().expect("uint"), 42);
}

#[test]
fn subtree_does_not_read_past_its_value() {
	let bytes = hex("91 01 02");
	let mut unpacker = Unpacker::new(&bytes);
	assert!(unpacker.advance().expect("header"));
	let mut subtree = unpacker.read_subtree().expect("subtree");
	assert!(subtree.advance().expect("item"));
	assert!(!subtree.advance().expect("bounded"));
	assert!(!subtree.has_remaining());
}

#[test]
fn subtree_on_scalar_is_rejected() {
	let bytes = hex("07");
	let mut unpacker = Unpacker::new(&bytes);
	assert!(unpacker.advance().expect("scalar"));
	let err = unpacker.read_subtree().err().expect("scalar has no subtree");
	assert!(matches!(err, PackError::InvalidStreamFormat { at: 0, .. }));
}

#[test]
fn nesting_beyond_max_depth_fails() {
	let bytes = hex("91 91 91 c0");
	let options = limited(2, 16);
	let mut unpacker = Unpacker::with_options(&bytes, &options);
	assert!(unpacker.advance().expect("level 0"));
	let mut first = unpacker.read_subtree().expect("depth 1");
	assert!(first.advance().expect("level 1"));
	let mut second = first.read_subtree().expect("depth 2");
	assert!(second.advance().expect("level 2"));
	let err = second.read_subtree().err().expect("depth 3");
	assert!(matches!(err, PackError::DepthExceeded { max_depth: 2 }));
}

#[test]
fn oversized_header_is_rejected() {
	let bytes = hex("93 01 02 03");
	let options = limited(8, 2);
	let mut unpacker = Unpacker::with_options(&bytes, &options);
	let err = unpacker.advance().expect_err("too many items");
	assert!(matches!(err, PackError::CollectionTooLarge { count: 3, max: 2 }));
}

#[test]
fn skip_value_consumes_nested_items() {
	// [{"a": 1}, 2] 7
	let bytes = hex("92 81 a1 61 01 02 07");
	let mut unpacker = Unpacker::new(&bytes);
	assert!(unpacker.advance().expect("header"));
	unpacker.skip_value().expect("skip");
	assert!(unpacker.advance().expect("trailing"));
	assert_eq!(unpacker.current(), Some(Token::UInt(7)));
}

#[test]
fn skip_value_reports_truncation() {
	let bytes = hex("92 01");
	let mut unpacker = Unpacker::new(&bytes);
	assert!(unpacker.advance().expect("header"));
	assert!(matches!(unpacker.skip_value(), Err(PackError::UnexpectedEndOfStream { .. })));
}

#[test]
fn integer_readers_convert_between_signedness() {
	let bytes = hex("d0 05 ff cf ff ff ff ff ff ff ff ff");
	let mut unpacker = Unpacker::new(&bytes);

	assert!(unpacker.advance().expect("int8"));
	assert_eq!(unpacker.read_u64().expect("positive int"), 5);

	assert!(unpacker.advance().expect("negative fixint"));
	assert!(matches!(unpacker.read_u64(), Err(PackError::IntegerOutOfRange { target: "u64", .. })));
	assert_eq!(unpacker.read_i64().expect("negative"), -1);

	assert!(unpacker.advance().expect("uint64"));
	assert!(matches!(unpacker.read_i64(), Err(PackError::IntegerOutOfRange { target: "i64", .. })));
	assert_eq!(unpacker.read_f64().expect("widened"), u64::MAX as f64);
}

#[test]
fn invalid_utf8_string_is_reported() {
	let bytes = hex("a1 ff");
	let mut unpacker = Unpacker::new(&bytes);
	assert!(unpacker.advance().expect("str"));
	assert!(matches!(unpacker.read_str(), Err(PackError::InvalidUtf8 { at: 0 })));
}
