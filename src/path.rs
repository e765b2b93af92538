use std::fmt;

use smallvec::SmallVec;

use crate::{FieldAccessor, Reflect, ReflectMut, ReflectRef, deref, deref_mut};

/// One hop from a value to a value nested inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
	/// Select a record field, possibly promoted from an embedded record.
	Field(FieldAccessor),
	/// Select a sequence element by zero-based index.
	Index(usize),
	/// Follow a pointer or interface to its inner value.
	Deref,
}

impl PathStep {
	fn apply<'v>(&self, value: &'v dyn Reflect) -> Option<&'v dyn Reflect> {
		match (self, value.reflect_ref()) {
			(Self::Field(accessor), ReflectRef::Record(record)) => accessor.get(record),
			(Self::Index(index), ReflectRef::List(list)) => list.element(*index),
			(Self::Index(index), ReflectRef::Array(array)) => array.element(*index),
			(Self::Deref, _) => deref(value),
			_ => None,
		}
	}

	fn apply_mut<'v>(&self, value: &'v mut dyn Reflect) -> Option<&'v mut dyn Reflect> {
		match self {
			Self::Deref => deref_mut(value),
			Self::Field(accessor) => match value.reflect_mut() {
				ReflectMut::Record(record) => accessor.get_mut(record),
				_ => None,
			},
			Self::Index(index) => match value.reflect_mut() {
				ReflectMut::List(list) => list.element_mut(*index),
				ReflectMut::Array(array) => array.element_mut(*index),
				_ => None,
			},
		}
	}
}

/// Derefs are transparent in the rendered form.
impl fmt::Display for PathStep {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Field(accessor) => write!(f, ".{}", accessor.name()),
			Self::Index(index) => write!(f, "[{index}]"),
			Self::Deref => Ok(()),
		}
	}
}

/// Steps from the navigator root to one frame.
pub(crate) type CursorPath = SmallVec<[PathStep; 8]>;

/// Follow `path` from `root`; `None` once any step no longer applies.
pub(crate) fn resolve<'v>(root: &'v dyn Reflect, path: &[PathStep]) -> Option<&'v dyn Reflect> {
	path.iter().try_fold(root, |value, step| step.apply(value))
}

/// Mutable counterpart of [`resolve`].
pub(crate) fn resolve_mut<'v>(root: &'v mut dyn Reflect, path: &[PathStep]) -> Option<&'v mut dyn Reflect> {
	path.iter().try_fold(root, |value, step| step.apply_mut(value))
}

/// Render `path` as `.field[index]` notation; the root renders as `.`.
pub(crate) fn display(path: &[PathStep]) -> String {
	let rendered: String = path.iter().map(ToString::to_string).collect();
	if rendered.is_empty() { ".".to_owned() } else { rendered }
}
