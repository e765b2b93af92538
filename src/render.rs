use std::fmt;

use crate::{Reflect, ReflectRef, Sequence};

/// Display adapter printing a reflected value in a compact one-line form.
///
/// Records print as `Name { field: value }`, sequences as `[a, b]`, nil
/// pointers as `nil`, and leaves through their `Debug` impl.
pub struct Render<'a>(pub &'a dyn Reflect);

impl fmt::Display for Render<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.0.reflect_ref() {
			ReflectRef::Record(record) => {
				let info = record.info();
				if info.fields.is_empty() {
					return write!(f, "{} {{}}", info.name);
				}
				write!(f, "{} {{ ", info.name)?;
				for (index, field) in info.fields.iter().enumerate() {
					if index > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{}: ", field.name)?;
					match record.field(index) {
						Some(value) => write!(f, "{}", Render(value))?,
						None => f.write_str("?")?,
					}
				}
				f.write_str(" }")
			}
			ReflectRef::List(list) => render_sequence(list, f),
			ReflectRef::Array(array) => render_sequence(array, f),
			ReflectRef::Pointer(pointer) => match pointer.pointee() {
				Some(value) => write!(f, "{}", Render(value)),
				None => f.write_str("nil"),
			},
			ReflectRef::Interface(Some(inner)) => write!(f, "{}", Render(inner)),
			ReflectRef::Interface(None) => f.write_str("nil"),
			ReflectRef::Scalar(leaf) => fmt::Debug::fmt(leaf, f),
		}
	}
}

fn render_sequence<S: Sequence + ?Sized>(sequence: &S, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	f.write_str("[")?;
	for index in 0..sequence.len() {
		if index > 0 {
			f.write_str(", ")?;
		}
		if let Some(value) = sequence.element(index) {
			write!(f, "{}", Render(value))?;
		}
	}
	f.write_str("]")
}

/// Render `value` with [`Render`].
pub fn render(value: &dyn Reflect) -> String {
	Render(value).to_string()
}

impl fmt::Debug for dyn Reflect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", Render(self))
	}
}

/// Strip module paths from every path segment of a type name.
///
/// `alloc::vec::Vec<alloc::string::String>` becomes `Vec<String>`.
pub fn short_type_name(name: &str) -> String {
	let mut out = String::with_capacity(name.len());
	let mut rest = name;
	while let Some(at) = rest.find(|c: char| matches!(c, '<' | '>' | ',' | '(' | ')' | '[' | ']' | '&' | ';' | ' ')) {
		out.push_str(last_segment(&rest[..at]));
		out.push_str(&rest[at..=at]);
		rest = &rest[at + 1..];
	}
	out.push_str(last_segment(rest));
	out
}

fn last_segment(path: &str) -> &str {
	path.rsplit("::").next().unwrap_or(path)
}
