use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::pack::codec::next_token;
use crate::pack::member::{FieldAccess, MemberAccess, MemberSlot};
use crate::pack::token::Token;
use crate::pack::{
	CodecRegistry, MemberDescriptor, NULL_CODEC, Nil, NilPolicy, PackCodec, PackError, Packable, Packer, Result, SerializationMethod, Unpacker,
};

/// Zero-argument constructor for decode targets.
#[derive(Clone, Copy)]
pub struct InstanceFactory<T> {
	create: fn() -> T,
}

impl<T> InstanceFactory<T> {
	/// Wrap a constructor function.
	pub fn new(create: fn() -> T) -> Self {
		Self { create }
	}

	/// Produce a fresh instance.
	pub fn create(&self) -> T {
		(self.create)()
	}
}

impl<T: Default> Default for InstanceFactory<T> {
	fn default() -> Self {
		Self::new(T::default)
	}
}

type BindFn<T> = Box<dyn FnOnce(&CodecRegistry) -> Result<Box<dyn MemberAccess<T>>>>;

enum PendingMember<T> {
	Real { descriptor: MemberDescriptor, bind: BindFn<T> },
	Synthetic,
}

/// Collects member metadata for one type and builds its [`ObjectCodec`].
///
/// Members are serialized in the order they are added.
pub struct ObjectCodecBuilder<T> {
	type_name: &'static str,
	factory: Option<InstanceFactory<T>>,
	members: Vec<PendingMember<T>>,
	stray_nil: bool,
}

impl<T: 'static> ObjectCodecBuilder<T> {
	/// Use `T::default` as the instance factory.
	pub fn with_default(mut self) -> Self
	where
		T: Default,
	{
		self.factory = Some(InstanceFactory::default());
		self
	}

	/// Use `create` as the instance factory.
	pub fn factory(mut self, create: fn() -> T) -> Self {
		self.factory = Some(InstanceFactory::new(create));
		self
	}

	/// Add an assignable member.
	pub fn member<V: Packable>(self, name: &str, get: fn(&T) -> &V, set: fn(&mut T, V)) -> Self {
		self.push_field(name, get, Some(set), None, None)
	}

	/// Add an assignable member encoded by `codec` instead of the registry's codec for `V`.
	pub fn member_with<V: Packable>(self, name: &str, get: fn(&T) -> &V, set: fn(&mut T, V), codec: Arc<dyn PackCodec<V>>) -> Self {
		self.push_field(name, get, Some(set), None, Some(codec))
	}

	/// Add a get-only member, filled in place by appending decoded items.
	pub fn read_only<V: Packable>(self, name: &str, get: fn(&T) -> &V, get_mut: fn(&mut T) -> &mut V) -> Self {
		self.push_field(name, get, None, Some(get_mut), None)
	}

	/// Set the nil policy of the most recently added member.
	///
	/// Calling this before any member or right after [`Self::synthetic`] makes [`Self::build`] fail.
	pub fn nil(mut self, policy: NilPolicy) -> Self {
		match self.members.last_mut() {
			Some(PendingMember::Real { descriptor, .. }) => descriptor.nil_policy = policy,
			_ => self.stray_nil = true,
		}
		self
	}

	/// Reserve an ordinal with no backing member.
	pub fn synthetic(mut self) -> Self {
		self.members.push(PendingMember::Synthetic);
		self
	}

	fn push_field<V: Packable>(
		mut self,
		name: &str,
		get: fn(&T) -> &V,
		set: Option<fn(&mut T, V)>,
		get_mut: Option<fn(&mut T) -> &mut V>,
		codec: Option<Arc<dyn PackCodec<V>>>,
	) -> Self {
		let declaring_type = self.type_name;
		let descriptor = MemberDescriptor {
			name: name.into(),
			nil_policy: NilPolicy::default(),
			collection: V::COLLECTION,
			has_setter: set.is_some(),
		};
		let bind: BindFn<T> = Box::new(move |registry: &CodecRegistry| {
			let access: Box<dyn MemberAccess<T>> = Box::new(FieldAccess {
				declaring_type,
				get,
				set,
				get_mut,
				codec: match codec {
					Some(codec) => codec,
					None => registry.resolve::<V>()?,
				},
			});
			Ok(access)
		});
		self.members.push(PendingMember::Real { descriptor, bind });
		self
	}

	/// Validate the mapping, resolve nested codecs, and build the accessor table.
	pub fn build(self, registry: &CodecRegistry) -> Result<ObjectCodec<T>> {
		let Some(factory) = self.factory else {
			return Err(PackError::NoDefaultConstructor { type_name: self.type_name });
		};
		if self.stray_nil {
			return Err(PackError::NilPolicyWithoutMember { type_name: self.type_name });
		}

		let mut index = HashMap::with_capacity(self.members.len());
		let mut members = Vec::with_capacity(self.members.len());
		for (ordinal, pending) in self.members.into_iter().enumerate() {
			match pending {
				PendingMember::Synthetic => members.push(MemberSlot::Synthetic),
				PendingMember::Real { descriptor, bind } => {
					if !descriptor.has_setter && !descriptor.collection {
						return Err(PackError::InvalidMemberMapping {
							type_name: self.type_name,
							member: descriptor.name,
						});
					}
					if index.insert(descriptor.name.clone(), ordinal).is_some() {
						return Err(PackError::DuplicateMemberName {
							type_name: self.type_name,
							member: descriptor.name,
						});
					}
					let access = bind(registry)?;
					members.push(MemberSlot::Real { descriptor, access });
				}
			}
		}

		log::debug!("built object codec for {} with {} member slots", self.type_name, members.len());

		Ok(ObjectCodec {
			type_name: self.type_name,
			factory,
			method: registry.options().method,
			real_members: index.len(),
			members,
			index,
		})
	}
}

/// Codec mapping a struct to an array- or map-shaped wire object.
///
/// Decoding accepts both shapes regardless of the configured encoding method.
pub struct ObjectCodec<T> {
	type_name: &'static str,
	factory: InstanceFactory<T>,
	method: SerializationMethod,
	real_members: usize,
	members: Vec<MemberSlot<T>>,
	index: HashMap<Box<str>, usize>,
}

impl<T: 'static> ObjectCodec<T> {
	/// Start describing the members of `type_name`.
	pub fn builder(type_name: &'static str) -> ObjectCodecBuilder<T> {
		ObjectCodecBuilder {
			type_name,
			factory: None,
			members: Vec::new(),
			stray_nil: false,
		}
	}
}

impl<T> ObjectCodec<T> {
	/// Number of ordinal slots, synthetic ones included.
	pub fn member_count(&self) -> usize {
		self.members.len()
	}

	/// Descriptor at `ordinal`, or `None` for synthetic slots and out-of-range ordinals.
	pub fn member(&self, ordinal: usize) -> Option<&MemberDescriptor> {
		self.members.get(ordinal).and_then(MemberSlot::descriptor)
	}

	/// Ordinal of the member with wire name `name`.
	pub fn ordinal_of(&self, name: &str) -> Option<usize> {
		self.index.get(name).copied()
	}

	/// Encoding shape used by `pack`.
	pub fn method(&self) -> SerializationMethod {
		self.method
	}

	fn unpack_array(&self, unpacker: &mut Unpacker<'_>, count: usize) -> Result<T> {
		if count != self.members.len() {
			return Err(PackError::UnexpectedArrayLength {
				expected: self.members.len(),
				actual: count,
			});
		}

		let mut instance = self.factory.create();
		for ordinal in 0..count {
			next_token(unpacker)?;
			self.unpack_member(unpacker, ordinal, &mut instance)?;
		}
		Ok(instance)
	}

	fn unpack_map(&self, unpacker: &mut Unpacker<'_>, count: usize) -> Result<T> {
		let mut instance = self.factory.create();
		for _ in 0..count {
			next_token(unpacker)?;
			let at = unpacker.position();
			let name = unpacker.read_str().map_err(|_| PackError::InvalidStreamFormat {
				at,
				reason: "cannot get a member name from stream",
			})?;

			let Some(&ordinal) = self.index.get(name) else {
				log::trace!("skipping unknown member {name} of {}", self.type_name);
				next_token(unpacker)?;
				unpacker.skip_value()?;
				continue;
			};

			next_token(unpacker)?;
			self.unpack_member(unpacker, ordinal, &mut instance)?;
		}
		Ok(instance)
	}

	fn unpack_member(&self, unpacker: &mut Unpacker<'_>, ordinal: usize, instance: &mut T) -> Result<()> {
		let MemberSlot::Real { descriptor, access } = &self.members[ordinal] else {
			if unpacker.is_collection_header() {
				let mut subtree = unpacker.read_subtree()?;
				NULL_CODEC.unpack(&mut subtree)?;
			} else {
				NULL_CODEC.unpack(unpacker)?;
			}
			return Ok(());
		};

		if unpacker.is_nil() {
			return match descriptor.nil_policy {
				NilPolicy::MemberDefault => Ok(()),
				NilPolicy::Null => access.set_nil(instance, descriptor),
				NilPolicy::Prohibit => Err(PackError::NullProhibited {
					member: descriptor.name.clone(),
				}),
			};
		}

		if unpacker.is_collection_header() {
			let mut subtree = unpacker.read_subtree()?;
			dispatch(&mut subtree, descriptor, access.as_ref(), instance)
		} else {
			dispatch(unpacker, descriptor, access.as_ref(), instance)
		}
	}
}

fn dispatch<T>(unpacker: &mut Unpacker<'_>, descriptor: &MemberDescriptor, access: &dyn MemberAccess<T>, instance: &mut T) -> Result<()> {
	if descriptor.has_setter {
		access.unpack_set(unpacker, instance)
	} else {
		access.unpack_append(unpacker, instance)
	}
}

impl<T> PackCodec<T> for ObjectCodec<T> {
	fn pack(&self, packer: &mut Packer, value: &T) -> Result<()> {
		match self.method {
			SerializationMethod::Array => {
				packer.write_array_header(self.members.len())?;
				for slot in &self.members {
					match slot {
						MemberSlot::Real { access, .. } => access.pack(packer, value)?,
						MemberSlot::Synthetic => NULL_CODEC.pack(packer, &Nil)?,
					}
				}
			}
			SerializationMethod::Map => {
				packer.write_map_header(self.real_members)?;
				for slot in &self.members {
					if let MemberSlot::Real { descriptor, access } = slot {
						packer.write_str(&descriptor.name)?;
						access.pack(packer, value)?;
					}
				}
			}
		}
		Ok(())
	}

	fn unpack(&self, unpacker: &mut Unpacker<'_>) -> Result<T> {
		match unpacker.expect_current()? {
			Token::ArrayHeader(count) => self.unpack_array(unpacker, count as usize),
			Token::MapHeader(count) => self.unpack_map(unpacker, count as usize),
			_ => Err(PackError::InvalidStreamFormat {
				at: unpacker.position(),
				reason: "object must start with an array or map header",
			}),
		}
	}

	fn type_name(&self) -> &'static str {
		self.type_name
	}

	fn dump(&self, out: &mut dyn fmt::Write, indent: usize) -> fmt::Result {
		let pad = " ".repeat(indent + 2);
		write!(out, "{} ({}) {{", self.type_name, self.method.as_str())?;
		for (ordinal, slot) in self.members.iter().enumerate() {
			match slot {
				MemberSlot::Real { descriptor, access } => {
					write!(out, "\n{pad}[{ordinal}] {}", descriptor.name)?;
					if !descriptor.has_setter {
						out.write_str(" (get-only)")?;
					}
					if descriptor.nil_policy != NilPolicy::MemberDefault {
						write!(out, " (nil: {})", descriptor.nil_policy.as_str())?;
					}
					out.write_str(": ")?;
					access.dump_codec(out, indent + 2)?;
				}
				MemberSlot::Synthetic => write!(out, "\n{pad}[{ordinal}] <reserved>: nil")?,
			}
		}
		write!(out, "\n{}}}", " ".repeat(indent))
	}
}
