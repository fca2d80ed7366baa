use std::sync::Arc;

use objpack_testkit::hex;

use super::{CodecRegistry, Packable};
use crate::pack::{ObjectCodec, PackCodec, PackError, PackOptions, Result, SerializationMethod, Serializer, Unpacker};

#[derive(Debug, Default)]
struct Pair {
	left: i64,
	right: String,
}

impl Packable for Pair {
	fn build_codec(registry: &CodecRegistry) -> Result<Arc<dyn PackCodec<Self>>> {
		let codec = ObjectCodec::<Self>::builder("Pair")
			.with_default()
			.member("left", |p| &p.left, |p, v| p.left = v)
			.member("right", |p| &p.right, |p, v| p.right = v)
			.build(registry)?;
		Ok(Arc::new(codec))
	}
}

#[derive(Debug, Default, PartialEq)]
struct Node {
	name: String,
	children: Vec<Node>,
}

impl Packable for Node {
	fn build_codec(registry: &CodecRegistry) -> Result<Arc<dyn PackCodec<Self>>> {
		let codec = ObjectCodec::<Self>::builder("Node")
			.with_default()
			.member("name", |n| &n.name, |n, v| n.name = v)
			.read_only("children", |n| &n.children, |n| &mut n.children)
			.build(registry)?;
		Ok(Arc::new(codec))
	}
}

fn same_codec<T>(left: &Arc<dyn PackCodec<T>>, right: &Arc<dyn PackCodec<T>>) -> bool {
	std::ptr::addr_eq(Arc::as_ptr(left), Arc::as_ptr(right))
}

#[test]
fn resolve_returns_cached_codec() {
	let registry = CodecRegistry::default();
	assert!(registry.is_empty());

	let first = registry.resolve::<Pair>().expect("pair codec");
	let second = registry.resolve::<Pair>().expect("cached pair codec");
	assert!(same_codec(&first, &second));
	assert_eq!(first.type_name(), "Pair");
}

#[test]
fn nested_codecs_are_cached_alongside() {
	let registry = CodecRegistry::default();
	registry.resolve::<Pair>().expect("pair codec");
	// Pair, i64, String
	assert_eq!(registry.len(), 3);

	registry.resolve::<Vec<Pair>>().expect("vec codec");
	assert_eq!(registry.len(), 4);
}

fn leaf(name: &str) -> Node {
	Node {
		name: name.to_owned(),
		children: Vec::new(),
	}
}

#[test]
fn self_referential_type_round_trips() {
	let registry = CodecRegistry::default();
	let serializer = Serializer::<Node>::new(&registry).expect("node codec");

	let mut tree = leaf("root");
	let mut branch = leaf("branch");
	branch.children.push(leaf("deep"));
	tree.children.push(branch);
	tree.children.push(leaf("side"));

	let bytes = serializer.pack(&tree).expect("pack");
	assert_eq!(serializer.unpack(&bytes).expect("unpack"), tree);
}

#[test]
fn self_referential_codec_is_shared_with_its_collection() {
	let registry = CodecRegistry::default();
	let node = registry.resolve::<Node>().expect("node codec");
	let again = registry.resolve::<Node>().expect("cached node codec");
	assert!(same_codec(&node, &again));

	let children = registry.resolve::<Vec<Node>>().expect("children codec");
	assert_eq!(children.type_name(), std::any::type_name::<Vec<Node>>());

	let mut dump = String::new();
	node.dump(&mut dump, 0).expect("dump");
	assert!(dump.contains("children (get-only): Vec<Node>"), "{dump}");
}

#[test]
fn deferred_codec_outliving_its_target_reports_detached() {
	let children = {
		let registry = CodecRegistry::default();
		registry.resolve::<Node>().expect("node codec");
		registry.resolve::<Vec<Node>>().expect("children codec")
	};

	let bytes = hex("91 92 a1 78 90");
	let mut unpacker = Unpacker::new(&bytes);
	assert!(unpacker.advance().expect("header"));
	let err = children.unpack(&mut unpacker).err().expect("detached");
	assert!(matches!(err, PackError::DetachedCodec { type_name } if type_name.ends_with("Node")));
}

#[test]
fn options_are_shared_with_codecs() {
	let registry = CodecRegistry::new(PackOptions::named());
	assert_eq!(registry.options().method, SerializationMethod::Map);
}

#[test]
fn concurrent_resolves_agree_on_one_codec() {
	let registry = CodecRegistry::default();
	let codecs: Vec<_> = std::thread::scope(|scope| {
		let handles: Vec<_> = (0..8).map(|_| scope.spawn(|| registry.resolve::<Pair>().expect("pair codec"))).collect();
		handles.into_iter().map(|handle| handle.join().expect("thread joins")).collect()
	});

	let cached = registry.resolve::<Pair>().expect("cached pair codec");
	assert!(codecs.iter().all(|codec| same_codec(codec, &cached)));
}
