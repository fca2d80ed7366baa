use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::RwLock;

use crate::pack::{PackCodec, PackError, PackOptions, Packer, Result, Unpacker};

/// A type the registry knows how to build a codec for.
pub trait Packable: Sized + Send + Sync + 'static {
	/// Whether the type is collection-valued and supports in-place append through `unpack_to`.
	const COLLECTION: bool = false;

	/// Build the codec for this type, resolving nested codecs through `registry`.
	fn build_codec(registry: &CodecRegistry) -> Result<Arc<dyn PackCodec<Self>>>;

	/// Value a member of this type takes when assigned nil, if the type has one.
	fn nil_value() -> Option<Self> {
		None
	}
}

/// Late-bound target of a codec still under construction.
type Slot<T> = Arc<OnceLock<Weak<dyn PackCodec<T>>>>;

struct Pending {
	registry: usize,
	id: TypeId,
	slot: Box<dyn Any>,
}

thread_local! {
	static BUILDING: RefCell<Vec<Pending>> = const { RefCell::new(Vec::new()) };
}

/// Marks a type as under construction on this thread for the guard's lifetime.
struct BuildGuard {
	registry: usize,
	id: TypeId,
}

impl BuildGuard {
	fn enter<T: Packable>(registry: usize, id: TypeId, slot: Slot<T>) -> Self {
		BUILDING.with(|stack| {
			stack.borrow_mut().push(Pending {
				registry,
				id,
				slot: Box::new(slot),
			})
		});
		Self { registry, id }
	}

	fn pending<T: Packable>(registry: usize, id: TypeId) -> Option<Slot<T>> {
		BUILDING.with(|stack| {
			stack
				.borrow()
				.iter()
				.rev()
				.find(|pending| pending.registry == registry && pending.id == id)
				.and_then(|pending| pending.slot.downcast_ref::<Slot<T>>())
				.cloned()
		})
	}
}

impl Drop for BuildGuard {
	fn drop(&mut self) {
		BUILDING.with(|stack| {
			let mut stack = stack.borrow_mut();
			if let Some(pos) = stack.iter().rposition(|pending| pending.registry == self.registry && pending.id == self.id) {
				stack.remove(pos);
			}
		});
	}
}

/// Stand-in handed out when a type's codec is requested while that codec is being built.
///
/// Forwards to the finished codec once it is cached. Holds it weakly so a self-referential
/// codec does not keep itself alive.
struct DeferredCodec<T> {
	type_name: &'static str,
	slot: Slot<T>,
}

impl<T> DeferredCodec<T> {
	fn target(&self) -> Result<Arc<dyn PackCodec<T>>> {
		self.slot
			.get()
			.and_then(Weak::upgrade)
			.ok_or(PackError::DetachedCodec { type_name: self.type_name })
	}
}

impl<T: Packable> PackCodec<T> for DeferredCodec<T> {
	fn pack(&self, packer: &mut Packer, value: &T) -> Result<()> {
		self.target()?.pack(packer, value)
	}

	fn unpack(&self, unpacker: &mut Unpacker<'_>) -> Result<T> {
		self.target()?.unpack(unpacker)
	}

	fn unpack_to(&self, unpacker: &mut Unpacker<'_>, collection: &mut T) -> Result<()> {
		self.target()?.unpack_to(unpacker, collection)
	}

	fn type_name(&self) -> &'static str {
		self.target().map_or(self.type_name, |codec| codec.type_name())
	}

	// The target's structure is already being printed further up.
	fn dump(&self, out: &mut dyn fmt::Write, _indent: usize) -> fmt::Result {
		out.write_str(self.type_name())
	}
}

/// Resolves and caches one codec per Rust type.
///
/// Codecs are built on first request and shared afterwards. The registry can be used from many
/// threads; two threads racing to build the same type keep whichever codec is cached first.
pub struct CodecRegistry {
	options: PackOptions,
	cache: RwLock<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

impl Default for CodecRegistry {
	fn default() -> Self {
		Self::new(PackOptions::default())
	}
}

impl CodecRegistry {
	/// Create an empty registry.
	pub fn new(options: PackOptions) -> Self {
		Self {
			options,
			cache: RwLock::new(HashMap::new()),
		}
	}

	/// Options shared by codecs built from this registry.
	pub fn options(&self) -> &PackOptions {
		&self.options
	}

	/// Number of cached codecs.
	pub fn len(&self) -> usize {
		self.cache.read().len()
	}

	/// Whether no codec has been built yet.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Return the codec for `T`, building and caching it on first use.
	pub fn resolve<T: Packable>(&self) -> Result<Arc<dyn PackCodec<T>>> {
		let id = TypeId::of::<T>();
		if let Some(codec) = self.cached::<T>(id) {
			return Ok(codec);
		}

		let type_name = std::any::type_name::<T>();
		let key = self as *const Self as usize;
		if let Some(slot) = BuildGuard::pending::<T>(key, id) {
			log::debug!("deferring self-referential codec for {type_name}");
			return Ok(Arc::new(DeferredCodec { type_name, slot }));
		}

		let slot: Slot<T> = Arc::new(OnceLock::new());
		let built = {
			let _guard = BuildGuard::enter(key, id, Arc::clone(&slot));
			T::build_codec(self)?
		};

		let codec = {
			let mut cache = self.cache.write();
			let entry = cache.entry(id).or_insert_with(|| {
				log::debug!("cached codec for {type_name}");
				Box::new(built.clone()) as Box<dyn Any + Send + Sync>
			});
			entry.downcast_ref::<Arc<dyn PackCodec<T>>>().cloned().unwrap_or(built)
		};
		let _ = slot.set(Arc::downgrade(&codec));
		Ok(codec)
	}

	fn cached<T: Packable>(&self, id: TypeId) -> Option<Arc<dyn PackCodec<T>>> {
		self.cache
			.read()
			.get(&id)
			.and_then(|entry| entry.downcast_ref::<Arc<dyn PackCodec<T>>>())
			.cloned()
	}
}

#[cfg(test)]
mod tests;
