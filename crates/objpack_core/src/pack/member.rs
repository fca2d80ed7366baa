use std::fmt;
use std::sync::Arc;

use crate::pack::{PackCodec, PackError, Packable, Packer, Result, Unpacker};

/// What a member does when the wire value is nil.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NilPolicy {
	/// Leave the value produced by the instance factory untouched.
	#[default]
	MemberDefault,
	/// Assign the member type's nil value.
	Null,
	/// Reject the stream.
	Prohibit,
}

impl NilPolicy {
	/// Render the policy as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::MemberDefault => "member-default",
			Self::Null => "null",
			Self::Prohibit => "prohibit",
		}
	}
}

/// Static description of one serialized member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDescriptor {
	/// Key used in map-shaped objects.
	pub name: Box<str>,
	/// Nil handling on decode.
	pub nil_policy: NilPolicy,
	/// Whether the member type is an appendable collection.
	pub collection: bool,
	/// Whether the member can be assigned, rather than only filled in place.
	pub has_setter: bool,
}

/// Precompiled get/set operations for one member of `T`, with its nested codec.
pub(crate) trait MemberAccess<T>: Send + Sync {
	/// Decode a fresh value and assign it.
	fn unpack_set(&self, unpacker: &mut Unpacker<'_>, target: &mut T) -> Result<()>;

	/// Decode into the member's existing collection.
	fn unpack_append(&self, unpacker: &mut Unpacker<'_>, target: &mut T) -> Result<()>;

	/// Assign the member type's nil value.
	fn set_nil(&self, target: &mut T, member: &MemberDescriptor) -> Result<()>;

	/// Encode the member's current value.
	fn pack(&self, packer: &mut Packer, source: &T) -> Result<()>;

	/// Render the nested codec.
	fn dump_codec(&self, out: &mut dyn fmt::Write, indent: usize) -> fmt::Result;
}

/// Accessor table entry backed by plain function pointers.
pub(crate) struct FieldAccess<T, V> {
	pub declaring_type: &'static str,
	pub get: fn(&T) -> &V,
	pub set: Option<fn(&mut T, V)>,
	pub get_mut: Option<fn(&mut T) -> &mut V>,
	pub codec: Arc<dyn PackCodec<V>>,
}

impl<T, V> MemberAccess<T> for FieldAccess<T, V>
where
	T: 'static,
	V: Packable,
{
	fn unpack_set(&self, unpacker: &mut Unpacker<'_>, target: &mut T) -> Result<()> {
		let Some(set) = self.set else {
			return Err(PackError::UnsupportedOperation { operation: "set on get-only member" });
		};
		let value = self.codec.unpack(unpacker)?;
		set(target, value);
		Ok(())
	}

	fn unpack_append(&self, unpacker: &mut Unpacker<'_>, target: &mut T) -> Result<()> {
		let Some(get_mut) = self.get_mut else {
			return Err(PackError::UnsupportedOperation {
				operation: "append on settable member",
			});
		};
		self.codec.unpack_to(unpacker, get_mut(target))
	}

	fn set_nil(&self, target: &mut T, member: &MemberDescriptor) -> Result<()> {
		let Some(set) = self.set else {
			return Err(PackError::ReadOnlyMemberItemsMustNotBeNull { member: member.name.clone() });
		};
		let Some(nil) = V::nil_value() else {
			return Err(PackError::ValueTypeCannotBeNull {
				member: member.name.clone(),
				value_type: std::any::type_name::<V>(),
				declaring_type: self.declaring_type,
			});
		};
		set(target, nil);
		Ok(())
	}

	fn pack(&self, packer: &mut Packer, source: &T) -> Result<()> {
		self.codec.pack(packer, (self.get)(source))
	}

	fn dump_codec(&self, out: &mut dyn fmt::Write, indent: usize) -> fmt::Result {
		self.codec.dump(out, indent)
	}
}

/// One ordinal position of an object's member table.
pub(crate) enum MemberSlot<T> {
	/// Member backed by a field.
	Real {
		descriptor: MemberDescriptor,
		access: Box<dyn MemberAccess<T>>,
	},
	/// Reserved position with no backing field; carries nil on the wire.
	Synthetic,
}

impl<T> MemberSlot<T> {
	pub fn descriptor(&self) -> Option<&MemberDescriptor> {
		match self {
			Self::Real { descriptor, .. } => Some(descriptor),
			Self::Synthetic => None,
		}
	}
}
