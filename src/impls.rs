//! `Reflect` implementations for std types.

use std::any::type_name;
use std::fmt;

use crate::{Kind, List, Pointer, Reflect, ReflectMut, ReflectRef, ScalarMut, Sequence, take};

macro_rules! impl_scalar {
	($($ty:ty => $kind:ident / $slot:ident),* $(,)?) => {
		$(
			impl Reflect for $ty {
				fn kind(&self) -> Kind {
					Kind::$kind
				}

				fn reflect_ref(&self) -> ReflectRef<'_> {
					ReflectRef::Scalar(self)
				}

				fn reflect_mut(&mut self) -> ReflectMut<'_> {
					ReflectMut::Scalar(ScalarMut::$slot(self))
				}

				fn type_kind() -> Kind {
					Kind::$kind
				}

				crate::__reflect_boilerplate!();
				crate::__reflect_assign!();
			}
		)*
	};
}

impl_scalar! {
	String => String / String,
	bool => Bool / Bool,
	i8 => Int / I8,
	i16 => Int / I16,
	i32 => Int / I32,
	i64 => Int / I64,
	isize => Int / Isize,
	u8 => Uint / U8,
	u16 => Uint / U16,
	u32 => Uint / U32,
	u64 => Uint / U64,
	usize => Uint / Usize,
	f32 => Float / F32,
	f64 => Float / F64,
	char => Other / Char,
}

impl<T: Reflect + Default> Reflect for Vec<T> {
	fn kind(&self) -> Kind {
		Kind::Slice
	}

	fn reflect_ref(&self) -> ReflectRef<'_> {
		ReflectRef::List(self)
	}

	fn reflect_mut(&mut self) -> ReflectMut<'_> {
		ReflectMut::List(self)
	}

	fn type_kind() -> Kind {
		Kind::Slice
	}

	crate::__reflect_boilerplate!();
	crate::__reflect_assign!();
}

impl<T: Reflect + Default> Sequence for Vec<T> {
	fn len(&self) -> usize {
		Vec::len(self)
	}

	fn element(&self, index: usize) -> Option<&dyn Reflect> {
		self.as_slice().get(index).map(|item| item as &dyn Reflect)
	}

	fn element_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
		self.as_mut_slice().get_mut(index).map(|item| item as &mut dyn Reflect)
	}

	fn element_kind(&self) -> Kind {
		T::type_kind()
	}

	fn element_type_name(&self) -> &'static str {
		type_name::<T>()
	}
}

impl<T: Reflect + Default> List for Vec<T> {
	fn push_default(&mut self) {
		Vec::push(self, T::default());
	}

	fn push_value(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
		let mut element = T::default();
		element.assign(value)?;
		Vec::push(self, element);
		Ok(())
	}
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
	fn kind(&self) -> Kind {
		Kind::Array
	}

	fn reflect_ref(&self) -> ReflectRef<'_> {
		ReflectRef::Array(self)
	}

	fn reflect_mut(&mut self) -> ReflectMut<'_> {
		ReflectMut::Array(self)
	}

	fn type_kind() -> Kind {
		Kind::Array
	}

	crate::__reflect_boilerplate!();
	crate::__reflect_assign!();
}

impl<T: Reflect, const N: usize> Sequence for [T; N] {
	fn len(&self) -> usize {
		N
	}

	fn element(&self, index: usize) -> Option<&dyn Reflect> {
		self.as_slice().get(index).map(|item| item as &dyn Reflect)
	}

	fn element_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
		self.as_mut_slice().get_mut(index).map(|item| item as &mut dyn Reflect)
	}

	fn element_kind(&self) -> Kind {
		T::type_kind()
	}

	fn element_type_name(&self) -> &'static str {
		type_name::<T>()
	}
}

impl<T: Reflect + Default> Reflect for Option<T> {
	fn kind(&self) -> Kind {
		Kind::Pointer
	}

	fn reflect_ref(&self) -> ReflectRef<'_> {
		ReflectRef::Pointer(self)
	}

	fn reflect_mut(&mut self) -> ReflectMut<'_> {
		ReflectMut::Pointer(self)
	}

	fn into_pointee(self: Box<Self>) -> Option<Box<dyn Reflect>> {
		(*self).map(|value| Box::new(value) as Box<dyn Reflect>)
	}

	fn type_kind() -> Kind {
		Kind::Pointer
	}

	crate::__reflect_boilerplate!();
	crate::__reflect_assign!();
}

impl<T: Reflect + Default> Pointer for Option<T> {
	fn is_nil(&self) -> bool {
		self.is_none()
	}

	fn pointee(&self) -> Option<&dyn Reflect> {
		self.as_ref().map(|value| value as &dyn Reflect)
	}

	fn pointee_mut(&mut self) -> Option<&mut dyn Reflect> {
		self.as_mut().map(|value| value as &mut dyn Reflect)
	}

	fn pointee_kind(&self) -> Kind {
		T::type_kind()
	}

	fn pointee_type_name(&self) -> &'static str {
		type_name::<T>()
	}

	fn allocate(&mut self) {
		if self.is_none() {
			*self = Some(T::default());
		}
	}

	fn point_to(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
		let mut pointee = T::default();
		pointee.assign(value)?;
		*self = Some(pointee);
		Ok(())
	}
}

impl<T: Reflect> Reflect for Box<T> {
	fn kind(&self) -> Kind {
		Kind::Pointer
	}

	fn reflect_ref(&self) -> ReflectRef<'_> {
		ReflectRef::Pointer(self)
	}

	fn reflect_mut(&mut self) -> ReflectMut<'_> {
		ReflectMut::Pointer(self)
	}

	fn into_pointee(self: Box<Self>) -> Option<Box<dyn Reflect>> {
		let inner: Box<T> = *self;
		Some(inner as Box<dyn Reflect>)
	}

	fn type_kind() -> Kind {
		Kind::Pointer
	}

	crate::__reflect_boilerplate!();
	crate::__reflect_assign!();
}

impl<T: Reflect> Pointer for Box<T> {
	fn is_nil(&self) -> bool {
		false
	}

	fn pointee(&self) -> Option<&dyn Reflect> {
		Some(&**self as &dyn Reflect)
	}

	fn pointee_mut(&mut self) -> Option<&mut dyn Reflect> {
		Some(&mut **self as &mut dyn Reflect)
	}

	fn pointee_kind(&self) -> Kind {
		T::type_kind()
	}

	fn pointee_type_name(&self) -> &'static str {
		type_name::<T>()
	}

	fn allocate(&mut self) {}

	fn point_to(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
		**self = take::<T>(value)?;
		Ok(())
	}
}

/// Type-erased reflected value, the navigator's interface kind.
///
/// Assigning through a `Dynamic` slot accepts a value of any type. The
/// default value is nil.
#[derive(Default)]
pub struct Dynamic(Option<Box<dyn Reflect>>);

impl Dynamic {
	/// Erase `value`.
	pub fn new<T: Reflect>(value: T) -> Self {
		Self(Some(Box::new(value)))
	}

	/// Whether no value is held.
	pub fn is_nil(&self) -> bool {
		self.0.is_none()
	}

	/// Inner value, if any.
	pub fn get(&self) -> Option<&dyn Reflect> {
		self.0.as_deref()
	}

	/// Inner value, mutably.
	pub fn get_mut(&mut self) -> Option<&mut dyn Reflect> {
		self.0.as_deref_mut()
	}

	/// Downcast the inner value by reference.
	pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
		self.get()?.as_any().downcast_ref::<T>()
	}
}

impl fmt::Debug for Dynamic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.get() {
			Some(inner) => fmt::Debug::fmt(inner, f),
			None => f.write_str("nil"),
		}
	}
}

impl Reflect for Dynamic {
	fn kind(&self) -> Kind {
		Kind::Interface
	}

	fn reflect_ref(&self) -> ReflectRef<'_> {
		ReflectRef::Interface(self.get())
	}

	fn reflect_mut(&mut self) -> ReflectMut<'_> {
		ReflectMut::Interface(self.get_mut())
	}

	fn assign(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
		self.0 = match take::<Dynamic>(value) {
			Ok(dynamic) => dynamic.0,
			Err(value) => Some(value),
		};
		Ok(())
	}

	fn type_kind() -> Kind {
		Kind::Interface
	}

	crate::__reflect_boilerplate!();
}
