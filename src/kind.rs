use std::fmt;

use serde::Serialize;

/// Coarse runtime category of a reflected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
	/// Record with named fields.
	Record,
	/// Growable sequence (`Vec<T>`).
	Slice,
	/// Fixed-length sequence (`[T; N]`).
	Array,
	/// Optional or boxed value (`Option<T>`, `Box<T>`).
	Pointer,
	/// Type-erased value ([`Dynamic`](crate::Dynamic)).
	Interface,
	/// Owned UTF-8 string.
	String,
	/// Boolean scalar.
	Bool,
	/// Signed integer scalar of any width.
	Int,
	/// Unsigned integer scalar of any width.
	Uint,
	/// Floating point scalar of any width.
	Float,
	/// Any other leaf value.
	Other,
}

impl Kind {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Record => "record",
			Self::Slice => "slice",
			Self::Array => "array",
			Self::Pointer => "pointer",
			Self::Interface => "interface",
			Self::String => "string",
			Self::Bool => "bool",
			Self::Int => "int",
			Self::Uint => "uint",
			Self::Float => "float",
			Self::Other => "other",
		}
	}

	/// Whether values of this kind wrap another value.
	pub fn is_indirect(self) -> bool {
		matches!(self, Self::Pointer | Self::Interface)
	}
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
