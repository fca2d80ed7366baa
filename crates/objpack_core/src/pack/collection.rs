use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::pack::codec::{array_len, map_len, next_token};
use crate::pack::{CodecRegistry, PackCodec, Packable, Packer, Result, Unpacker, unpack_item};

/// Codec for `Vec<V>` as an array of items.
pub struct VecCodec<V> {
	item: Arc<dyn PackCodec<V>>,
}

impl<V> VecCodec<V> {
	/// Create the codec from the item codec.
	pub fn new(item: Arc<dyn PackCodec<V>>) -> Self {
		Self { item }
	}
}

impl<V> PackCodec<Vec<V>> for VecCodec<V> {
	fn pack(&self, packer: &mut Packer, value: &Vec<V>) -> Result<()> {
		packer.write_array_header(value.len())?;
		for item in value {
			self.item.pack(packer, item)?;
		}
		Ok(())
	}

	fn unpack(&self, unpacker: &mut Unpacker<'_>) -> Result<Vec<V>> {
		let mut out = Vec::with_capacity(array_len(unpacker)?);
		self.unpack_to(unpacker, &mut out)?;
		Ok(out)
	}

	fn unpack_to(&self, unpacker: &mut Unpacker<'_>, collection: &mut Vec<V>) -> Result<()> {
		let count = array_len(unpacker)?;
		collection.reserve(count);
		for _ in 0..count {
			next_token(unpacker)?;
			collection.push(unpack_item(&*self.item, unpacker)?);
		}
		Ok(())
	}

	fn dump(&self, out: &mut dyn fmt::Write, indent: usize) -> fmt::Result {
		out.write_str("Vec<")?;
		self.item.dump(out, indent)?;
		out.write_str(">")
	}
}

impl<V: Packable> Packable for Vec<V> {
	const COLLECTION: bool = true;

	fn build_codec(registry: &CodecRegistry) -> Result<Arc<dyn PackCodec<Self>>> {
		Ok(Arc::new(VecCodec::new(registry.resolve::<V>()?)))
	}
}

/// Codec for `Option<V>`: `None` is nil.
pub struct OptionCodec<V> {
	inner: Arc<dyn PackCodec<V>>,
}

impl<V> OptionCodec<V> {
	/// Create the codec from the inner codec.
	pub fn new(inner: Arc<dyn PackCodec<V>>) -> Self {
		Self { inner }
	}
}

impl<V> PackCodec<Option<V>> for OptionCodec<V> {
	fn pack(&self, packer: &mut Packer, value: &Option<V>) -> Result<()> {
		match value {
			Some(inner) => self.inner.pack(packer, inner),
			None => {
				packer.write_nil();
				Ok(())
			}
		}
	}

	fn unpack(&self, unpacker: &mut Unpacker<'_>) -> Result<Option<V>> {
		unpacker.expect_current()?;
		if unpacker.is_nil() {
			return Ok(None);
		}
		self.inner.unpack(unpacker).map(Some)
	}

	fn dump(&self, out: &mut dyn fmt::Write, indent: usize) -> fmt::Result {
		out.write_str("Option<")?;
		self.inner.dump(out, indent)?;
		out.write_str(">")
	}
}

impl<V: Packable> Packable for Option<V> {
	fn build_codec(registry: &CodecRegistry) -> Result<Arc<dyn PackCodec<Self>>> {
		Ok(Arc::new(OptionCodec::new(registry.resolve::<V>()?)))
	}

	fn nil_value() -> Option<Self> {
		Some(None)
	}
}

/// Map containers the [`MapCodec`] can fill and walk.
pub trait MapLike<K, V>: Default {
	/// Entry count.
	fn entry_count(&self) -> usize;
	/// Insert one entry, replacing an existing value for the key.
	fn insert_entry(&mut self, key: K, value: V);
	/// Visit entries in the container's iteration order.
	fn try_for_each_entry(&self, visit: &mut dyn FnMut(&K, &V) -> Result<()>) -> Result<()>;
}

impl<K: Ord, V> MapLike<K, V> for BTreeMap<K, V> {
	fn entry_count(&self) -> usize {
		self.len()
	}

	fn insert_entry(&mut self, key: K, value: V) {
		self.insert(key, value);
	}

	fn try_for_each_entry(&self, visit: &mut dyn FnMut(&K, &V) -> Result<()>) -> Result<()> {
		self.iter().try_for_each(|(key, value)| visit(key, value))
	}
}

impl<K: Eq + Hash, V> MapLike<K, V> for HashMap<K, V> {
	fn entry_count(&self) -> usize {
		self.len()
	}

	fn insert_entry(&mut self, key: K, value: V) {
		self.insert(key, value);
	}

	fn try_for_each_entry(&self, visit: &mut dyn FnMut(&K, &V) -> Result<()>) -> Result<()> {
		self.iter().try_for_each(|(key, value)| visit(key, value))
	}
}

/// Codec for key/value containers as a map of entries.
pub struct MapCodec<K, V, M> {
	key: Arc<dyn PackCodec<K>>,
	value: Arc<dyn PackCodec<V>>,
	_marker: PhantomData<fn() -> M>,
}

impl<K, V, M> MapCodec<K, V, M> {
	/// Create the codec from key and value codecs.
	pub fn new(key: Arc<dyn PackCodec<K>>, value: Arc<dyn PackCodec<V>>) -> Self {
		Self {
			key,
			value,
			_marker: PhantomData,
		}
	}
}

impl<K, V, M> PackCodec<M> for MapCodec<K, V, M>
where
	M: MapLike<K, V>,
{
	fn pack(&self, packer: &mut Packer, value: &M) -> Result<()> {
		packer.write_map_header(value.entry_count())?;
		value.try_for_each_entry(&mut |key, item| {
			self.key.pack(packer, key)?;
			self.value.pack(packer, item)
		})
	}

	fn unpack(&self, unpacker: &mut Unpacker<'_>) -> Result<M> {
		let mut out = M::default();
		self.unpack_to(unpacker, &mut out)?;
		Ok(out)
	}

	fn unpack_to(&self, unpacker: &mut Unpacker<'_>, collection: &mut M) -> Result<()> {
		let count = map_len(unpacker)?;
		for _ in 0..count {
			next_token(unpacker)?;
			let key = unpack_item(&*self.key, unpacker)?;
			next_token(unpacker)?;
			let value = unpack_item(&*self.value, unpacker)?;
			collection.insert_entry(key, value);
		}
		Ok(())
	}

	fn dump(&self, out: &mut dyn fmt::Write, indent: usize) -> fmt::Result {
		out.write_str("Map<")?;
		self.key.dump(out, indent)?;
		out.write_str(", ")?;
		self.value.dump(out, indent)?;
		out.write_str(">")
	}
}

impl<K: Packable + Ord, V: Packable> Packable for BTreeMap<K, V> {
	const COLLECTION: bool = true;

	fn build_codec(registry: &CodecRegistry) -> Result<Arc<dyn PackCodec<Self>>> {
		Ok(Arc::new(MapCodec::<K, V, Self>::new(registry.resolve::<K>()?, registry.resolve::<V>()?)))
	}
}

impl<K: Packable + Eq + Hash, V: Packable> Packable for HashMap<K, V> {
	const COLLECTION: bool = true;

	fn build_codec(registry: &CodecRegistry) -> Result<Arc<dyn PackCodec<Self>>> {
		Ok(Arc::new(MapCodec::<K, V, Self>::new(registry.resolve::<K>()?, registry.resolve::<V>()?)))
	}
}
