use thiserror::Error;

use crate::Kind;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Recoverable errors produced while navigating or mutating a value.
///
/// API misuse (popping the cursor below the root, appending a non-pointer
/// value) is not represented here; those conditions panic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
	/// Root handed to [`Navigator::from_pointer`](crate::Navigator::from_pointer) was a nil pointer.
	#[error("cannot build a nil value")]
	NilRoot,
	/// Root handed to [`Navigator::from_pointer`](crate::Navigator::from_pointer) was not a pointer.
	#[error("cannot build a {kind}: need a pointer")]
	NotAPointer {
		/// Kind of the rejected root.
		kind: Kind,
	},
	/// Current value does not have the kind the operation requires.
	#[error("incorrect kind: expected '{expected}', got '{actual}'")]
	IncorrectKind {
		/// Kind found at the cursor.
		actual: Kind,
		/// Kind the operation needed.
		expected: Kind,
	},
	/// Field name could not be resolved on the current record.
	#[error("field not found: '{field}' on '{record}'")]
	FieldNotFound {
		/// Requested address key.
		field: String,
		/// Short type name of the record searched.
		record: String,
		/// Rendered record value.
		value: String,
	},
	/// Two fields of a record share one address key and collisions are rejected.
	#[error("field '{field}' is ambiguous on '{record}'")]
	AmbiguousField {
		/// Colliding address key.
		field: String,
		/// Record type name.
		record: String,
	},
	/// Concrete type of a value differs from the slot it was assigned to.
	#[error("cannot assign '{value}' to '{target}'")]
	NotAssignable {
		/// Short type name of the receiving slot.
		target: String,
		/// Short type name of the rejected value.
		value: String,
	},
}
