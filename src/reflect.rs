use std::any::Any;
use std::fmt;

use crate::{Kind, RecordInfo};

/// Dynamic, non-owning view of a value whose shape is discovered at runtime.
///
/// Implemented for the std types the navigator understands (see `impls`) and
/// for user records through [`record!`](crate::record).
pub trait Reflect: Any {
	/// Runtime kind of this value.
	fn kind(&self) -> Kind;

	/// Fully qualified type name, as reported by [`std::any::type_name`].
	fn type_name(&self) -> &'static str {
		std::any::type_name::<Self>()
	}

	/// Kind-tagged shared view.
	fn reflect_ref(&self) -> ReflectRef<'_>;

	/// Kind-tagged mutable view.
	fn reflect_mut(&mut self) -> ReflectMut<'_>;

	/// Upcast for downcasting by concrete type.
	fn as_any(&self) -> &dyn Any;

	/// Mutable upcast for downcasting by concrete type.
	fn as_any_mut(&mut self) -> &mut dyn Any;

	/// Owned upcast for downcasting by concrete type.
	fn into_any(self: Box<Self>) -> Box<dyn Any>;

	/// Replace this value with `value` when the concrete types match.
	///
	/// Returns the rejected value otherwise.
	fn assign(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

	/// Unwrap an owned pointer value into its pointee.
	///
	/// Returns `None` for nil pointers and for every non-pointer kind.
	fn into_pointee(self: Box<Self>) -> Option<Box<dyn Reflect>> {
		None
	}

	/// Kind of the implementing type, without an instance.
	fn type_kind() -> Kind
	where
		Self: Sized;
}

/// Shared view of a reflected value, tagged by kind.
pub enum ReflectRef<'a> {
	/// Record with indexed fields.
	Record(&'a dyn Record),
	/// Growable sequence.
	List(&'a dyn List),
	/// Fixed-length sequence.
	Array(&'a dyn Sequence),
	/// Optional or boxed value.
	Pointer(&'a dyn Pointer),
	/// Type-erased inner value, `None` when nil.
	Interface(Option<&'a dyn Reflect>),
	/// Leaf value.
	Scalar(&'a dyn fmt::Debug),
}

/// Mutable view of a reflected value, tagged by kind.
pub enum ReflectMut<'a> {
	/// Record with indexed fields.
	Record(&'a mut dyn Record),
	/// Growable sequence.
	List(&'a mut dyn List),
	/// Fixed-length sequence.
	Array(&'a mut dyn Sequence),
	/// Optional or boxed value.
	Pointer(&'a mut dyn Pointer),
	/// Type-erased inner value, `None` when nil.
	Interface(Option<&'a mut dyn Reflect>),
	/// Leaf value.
	Scalar(ScalarMut<'a>),
}

/// Record access by declaration index.
pub trait Record {
	/// Static descriptor of this record type.
	fn info(&self) -> &'static RecordInfo;

	/// Field at declaration index `index`.
	fn field(&self, index: usize) -> Option<&dyn Reflect>;

	/// Mutable field at declaration index `index`.
	fn field_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;
}

/// Indexed sequence access shared by slices and arrays.
pub trait Sequence {
	/// Number of elements.
	fn len(&self) -> usize;

	/// Whether the sequence holds no element.
	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Element at `index`.
	fn element(&self, index: usize) -> Option<&dyn Reflect>;

	/// Mutable element at `index`.
	fn element_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

	/// Kind of the element type.
	fn element_kind(&self) -> Kind;

	/// Fully qualified element type name.
	fn element_type_name(&self) -> &'static str;
}

/// Growable sequence.
pub trait List: Sequence {
	/// Append a zero (`Default`) element.
	fn push_default(&mut self);

	/// Append `value` when a default element accepts it through [`Reflect::assign`]; returns it otherwise.
	fn push_value(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;
}

/// Optional or boxed indirection.
pub trait Pointer {
	/// Whether no pointee is present.
	fn is_nil(&self) -> bool;

	/// Pointee, if present.
	fn pointee(&self) -> Option<&dyn Reflect>;

	/// Mutable pointee, if present.
	fn pointee_mut(&mut self) -> Option<&mut dyn Reflect>;

	/// Kind of the pointee type, known even when nil.
	fn pointee_kind(&self) -> Kind;

	/// Fully qualified pointee type name.
	fn pointee_type_name(&self) -> &'static str;

	/// Install a zero pointee when nil; no-op otherwise.
	fn allocate(&mut self);

	/// Point at `value` when the pointee accepts it through [`Reflect::assign`]; returns it otherwise.
	fn point_to(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;
}

/// Mutable leaf slot.
pub enum ScalarMut<'a> {
	/// `String` slot.
	String(&'a mut String),
	/// `bool` slot.
	Bool(&'a mut bool),
	/// `i8` slot.
	I8(&'a mut i8),
	/// `i16` slot.
	I16(&'a mut i16),
	/// `i32` slot.
	I32(&'a mut i32),
	/// `i64` slot.
	I64(&'a mut i64),
	/// `isize` slot.
	Isize(&'a mut isize),
	/// `u8` slot.
	U8(&'a mut u8),
	/// `u16` slot.
	U16(&'a mut u16),
	/// `u32` slot.
	U32(&'a mut u32),
	/// `u64` slot.
	U64(&'a mut u64),
	/// `usize` slot.
	Usize(&'a mut usize),
	/// `f32` slot.
	F32(&'a mut f32),
	/// `f64` slot.
	F64(&'a mut f64),
	/// `char` slot.
	Char(&'a mut char),
}

impl ScalarMut<'_> {
	/// Store a string; false when the slot is not a string.
	pub fn set_string(self, value: String) -> bool {
		match self {
			Self::String(slot) => *slot = value,
			_ => return false,
		}
		true
	}

	/// Store a boolean; false when the slot is not a bool.
	pub fn set_bool(self, value: bool) -> bool {
		match self {
			Self::Bool(slot) => *slot = value,
			_ => return false,
		}
		true
	}

	/// Store a signed integer, truncating to the slot width.
	///
	/// False when the slot is not a signed integer.
	pub fn set_int(self, value: i64) -> bool {
		match self {
			Self::I8(slot) => *slot = value as i8,
			Self::I16(slot) => *slot = value as i16,
			Self::I32(slot) => *slot = value as i32,
			Self::I64(slot) => *slot = value,
			Self::Isize(slot) => *slot = value as isize,
			_ => return false,
		}
		true
	}

	/// Store a float, rounding to the slot precision.
	///
	/// False when the slot is not a float.
	pub fn set_float(self, value: f64) -> bool {
		match self {
			Self::F32(slot) => *slot = value as f32,
			Self::F64(slot) => *slot = value,
			_ => return false,
		}
		true
	}
}

/// Move a boxed reflected value out as `T`.
///
/// Returns the box untouched when its concrete type is not `T`.
pub fn take<T: Reflect>(value: Box<dyn Reflect>) -> Result<T, Box<dyn Reflect>> {
	if !value.as_any().is::<T>() {
		return Err(value);
	}
	match value.into_any().downcast::<T>() {
		Ok(value) => Ok(*value),
		Err(_) => unreachable!("concrete type checked above"),
	}
}

/// Follow one pointer or interface hop.
pub fn deref(value: &dyn Reflect) -> Option<&dyn Reflect> {
	match value.reflect_ref() {
		ReflectRef::Pointer(pointer) => pointer.pointee(),
		ReflectRef::Interface(inner) => inner,
		_ => None,
	}
}

/// Follow one pointer or interface hop mutably.
pub fn deref_mut(value: &mut dyn Reflect) -> Option<&mut dyn Reflect> {
	match value.reflect_mut() {
		ReflectMut::Pointer(pointer) => pointer.pointee_mut(),
		ReflectMut::Interface(inner) => inner,
		_ => None,
	}
}

/// Follow pointer and interface hops down to a record.
pub(crate) fn deref_record(value: &dyn Reflect) -> Option<&dyn Record> {
	match value.reflect_ref() {
		ReflectRef::Record(record) => Some(record),
		ReflectRef::Pointer(pointer) => deref_record(pointer.pointee()?),
		ReflectRef::Interface(inner) => deref_record(inner?),
		_ => None,
	}
}

/// Follow pointer and interface hops down to a mutable record.
pub(crate) fn deref_record_mut(value: &mut dyn Reflect) -> Option<&mut dyn Record> {
	match value.reflect_mut() {
		ReflectMut::Record(record) => Some(record),
		ReflectMut::Pointer(pointer) => deref_record_mut(pointer.pointee_mut()?),
		ReflectMut::Interface(inner) => deref_record_mut(inner?),
		_ => None,
	}
}

#[doc(hidden)]
#[macro_export]
macro_rules! __reflect_boilerplate {
	() => {
		fn as_any(&self) -> &dyn ::std::any::Any {
			self
		}

		fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
			self
		}

		fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::std::any::Any> {
			self
		}
	};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __reflect_assign {
	() => {
		fn assign(
			&mut self,
			value: ::std::boxed::Box<dyn $crate::Reflect>,
		) -> ::std::result::Result<(), ::std::boxed::Box<dyn $crate::Reflect>> {
			*self = $crate::take::<Self>(value)?;
			::std::result::Result::Ok(())
		}
	};
}
