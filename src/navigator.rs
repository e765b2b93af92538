use std::iter;

use log::trace;
use serde::Serialize;
use smallvec::smallvec;

use crate::path::{self, CursorPath, resolve, resolve_mut};
use crate::{BuildError, Kind, PathStep, Reflect, ReflectMut, ReflectRef, ResolutionCache, ResolveOptions, Result, ScalarMut, deref, render, short_type_name};

/// Stack-based cursor over a mutably borrowed value.
///
/// The navigator borrows its root for its whole lifetime; every mutation lands
/// in the caller's data. Frames are kept as paths from the root and resolved
/// again on each access. Every saved frame is a prefix of the current one, so
/// writes at the cursor never invalidate a frame.
#[derive(Debug)]
pub struct Navigator<'a> {
	root: &'a mut dyn Reflect,
	root_path: CursorPath,
	saved: Vec<CursorPath>,
	current: CursorPath,
	cache: ResolutionCache,
}

/// Serializable snapshot of one cursor frame, for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
	/// Position on the stack, `0` being the outermost frame.
	pub depth: usize,
	/// Path from the root, such as `.tags[0]`.
	pub path: String,
	/// Kind of the framed value.
	pub kind: Kind,
	/// Short type name of the framed value.
	pub type_name: String,
	/// Rendered framed value.
	pub value: String,
}

fn frame<'v>(root: &'v dyn Reflect, path: &[PathStep]) -> &'v dyn Reflect {
	match resolve(root, path) {
		Some(value) => value,
		None => unreachable!("navigator frame `{}` no longer resolves", path::display(path)),
	}
}

fn frame_mut<'v>(root: &'v mut dyn Reflect, path: &[PathStep]) -> &'v mut dyn Reflect {
	match resolve_mut(root, path) {
		Some(value) => value,
		None => unreachable!("navigator frame `{}` no longer resolves", path::display(path)),
	}
}

fn not_assignable(target: &str, value: &dyn Reflect) -> BuildError {
	BuildError::NotAssignable {
		target: short_type_name(target),
		value: short_type_name(value.type_name()),
	}
}

impl<'a> Navigator<'a> {
	/// Navigator over `root`, resolving field names through the metadata annotation `name_tag`.
	pub fn new<T: Reflect>(name_tag: impl Into<String>, root: &'a mut T) -> Self {
		Self::with_options(ResolveOptions::with_name_tag(name_tag), root)
	}

	/// Navigator over `root` with explicit resolution options.
	pub fn with_options<T: Reflect>(options: ResolveOptions, root: &'a mut T) -> Self {
		Self::with_cache(ResolutionCache::new(options), root)
	}

	/// Navigator over `root` reusing field maps memoized by an earlier navigator.
	pub fn with_cache<T: Reflect>(cache: ResolutionCache, root: &'a mut T) -> Self {
		Self::from_parts(cache, root, CursorPath::new())
	}

	/// Navigator building the pointee of a type-erased pointer.
	///
	/// The root frame is the pointee; `root` itself is never replaced.
	pub fn from_pointer(options: ResolveOptions, root: &'a mut dyn Reflect) -> Result<Self> {
		match root.reflect_ref() {
			ReflectRef::Pointer(pointer) if pointer.is_nil() => return Err(BuildError::NilRoot),
			ReflectRef::Pointer(_) => {}
			_ => return Err(BuildError::NotAPointer { kind: root.kind() }),
		}
		Ok(Self::from_parts(ResolutionCache::new(options), root, smallvec![PathStep::Deref]))
	}

	fn from_parts(cache: ResolutionCache, root: &'a mut dyn Reflect, root_path: CursorPath) -> Self {
		trace!("navigator rooted at {}", short_type_name(root.type_name()));
		Self {
			root,
			current: root_path.clone(),
			root_path,
			saved: Vec::new(),
			cache,
		}
	}

	/// Release the root and hand the memoized field maps back.
	pub fn into_cache(self) -> ResolutionCache {
		self.cache
	}

	/// Field maps memoized so far.
	pub fn cache(&self) -> &ResolutionCache {
		&self.cache
	}

	/// Value at the cursor.
	pub fn cursor(&self) -> &dyn Reflect {
		frame(&*self.root, &self.current)
	}

	/// Value at the cursor, mutably.
	pub fn cursor_mut(&mut self) -> &mut dyn Reflect {
		frame_mut(&mut *self.root, &self.current)
	}

	/// Steps from the root to the cursor.
	pub fn path(&self) -> &[PathStep] {
		&self.current
	}

	/// Number of frames on the stack, the current one included.
	pub fn depth(&self) -> usize {
		self.saved.len() + 1
	}

	/// Move the cursor into field `name` of the current record.
	///
	/// Pointers and interfaces at the cursor are followed first; a nil one
	/// reports its own kind as [`BuildError::IncorrectKind`]. The cursor does
	/// not move on error.
	pub fn dig_field(&mut self, name: &str) -> Result<()> {
		let Self { root, current, cache, .. } = self;
		let mut value = frame(&**root, current);
		let mut derefs = 0;
		while value.kind().is_indirect() {
			let Some(inner) = deref(value) else {
				return Err(BuildError::IncorrectKind {
					actual: value.kind(),
					expected: Kind::Record,
				});
			};
			value = inner;
			derefs += 1;
		}

		let ReflectRef::Record(record) = value.reflect_ref() else {
			return Err(BuildError::IncorrectKind {
				actual: value.kind(),
				expected: Kind::Record,
			});
		};
		let info = record.info();
		let accessor = cache
			.resolve(info, name)?
			.filter(|accessor| accessor.get(record).is_some())
			.ok_or_else(|| BuildError::FieldNotFound {
				field: name.to_owned(),
				record: info.name.to_owned(),
				value: render(value),
			})?;

		trace!("dig {}.{} ({:?})", info.name, name, accessor.indices());
		current.extend(iter::repeat_n(PathStep::Deref, derefs));
		current.push(PathStep::Field(accessor));
		Ok(())
	}

	/// Remember the current position; [`load`](Self::load) returns to it.
	pub fn save(&mut self) {
		self.saved.push(self.current.clone());
		trace!("save at {}", path::display(&self.current));
	}

	/// Discard the current position and return to the last saved one.
	///
	/// # Panics
	///
	/// Panics when nothing was saved.
	pub fn load(&mut self) {
		let Some(previous) = self.saved.pop() else {
			panic!("tried to load a saved cursor when the cursor was already at root");
		};
		self.current = previous;
		trace!("load {}", path::display(&self.current));
	}

	/// Drop every saved position and move the cursor back to the root.
	pub fn reset(&mut self) {
		self.saved.clear();
		self.current = self.root_path.clone();
	}

	/// Whether the cursor is on a slice.
	pub fn is_slice(&self) -> bool {
		self.cursor().kind() == Kind::Slice
	}

	/// Whether the cursor is on a slice or on a pointer to one, nil or not.
	pub fn is_slice_or_pointer_to_slice(&self) -> bool {
		match self.cursor().reflect_ref() {
			ReflectRef::List(_) => true,
			ReflectRef::Pointer(pointer) => pointer.pointee_kind() == Kind::Slice,
			_ => false,
		}
	}

	/// Move to the last element of the current slice or array.
	///
	/// No-op for empty sequences and every other kind.
	pub fn last(&mut self) {
		let len = match self.cursor().reflect_ref() {
			ReflectRef::List(list) => list.len(),
			ReflectRef::Array(array) => array.len(),
			_ => return,
		};
		if len > 0 {
			self.current.push(PathStep::Index(len - 1));
		}
	}

	/// Move to the last element of the current slice, appending one if it is empty.
	pub fn slice_last_or_create(&mut self) -> Result<()> {
		let value = self.cursor();
		let ReflectRef::List(list) = value.reflect_ref() else {
			return Err(BuildError::IncorrectKind {
				actual: value.kind(),
				expected: Kind::Slice,
			});
		};
		if list.is_empty() {
			return self.slice_new_elem();
		}
		self.last();
		Ok(())
	}

	/// Append a default element to the current slice and move to it.
	pub fn slice_new_elem(&mut self) -> Result<()> {
		let Self { root, current, .. } = self;
		let value = frame_mut(&mut **root, current);
		let actual = value.kind();
		let ReflectMut::List(list) = value.reflect_mut() else {
			return Err(BuildError::IncorrectKind { actual, expected: Kind::Slice });
		};
		list.push_default();
		let index = list.len() - 1;
		trace!("new element [{index}] of {}", short_type_name(list.element_type_name()));
		current.push(PathStep::Index(index));
		Ok(())
	}

	/// Append `value` to the current slice and move to the new element.
	///
	/// The cursor may also be on a pointer to a slice; a nil one is allocated
	/// first. Slices of pointers receive `value` as is, other slices receive
	/// its pointee.
	///
	/// # Panics
	///
	/// Panics when `value` is not a pointer or is a nil one.
	pub fn slice_append(&mut self, value: Box<dyn Reflect>) -> Result<()> {
		match value.reflect_ref() {
			ReflectRef::Pointer(pointer) if !pointer.is_nil() => {}
			ReflectRef::Pointer(_) => panic!("cannot append nil '{}'", short_type_name(value.type_name())),
			_ => panic!("value '{}' should be a pointer, not '{}'", render(&*value), value.kind()),
		}

		let Self { root, current, .. } = self;
		let mut slice_path = current.clone();
		if let ReflectMut::Pointer(pointer) = frame_mut(&mut **root, current).reflect_mut() {
			pointer.allocate();
			slice_path.push(PathStep::Deref);
		}

		let target = frame_mut(&mut **root, &slice_path);
		let actual = target.kind();
		let ReflectMut::List(list) = target.reflect_mut() else {
			return Err(BuildError::IncorrectKind { actual, expected: Kind::Slice });
		};

		let element = if list.element_kind() == Kind::Pointer {
			value
		} else {
			match value.into_pointee() {
				Some(pointee) => pointee,
				None => unreachable!("non-nil pointer checked above"),
			}
		};
		list.push_value(element).map_err(|rejected| not_assignable(list.element_type_name(), &*rejected))?;
		let index = list.len() - 1;
		trace!("append [{index}] to {}", path::display(&slice_path));

		slice_path.push(PathStep::Index(index));
		*current = slice_path;
		Ok(())
	}

	fn store_scalar(&mut self, expected: Kind, store: impl FnOnce(ScalarMut<'_>) -> bool) -> Result<()> {
		let target = self.cursor_mut();
		let actual = target.kind();
		let stored = match target.reflect_mut() {
			ReflectMut::Scalar(slot) => store(slot),
			_ => false,
		};
		if stored { Ok(()) } else { Err(BuildError::IncorrectKind { actual, expected }) }
	}

	/// Store a string at the cursor.
	///
	/// A pointer to a string at the cursor is pointed at a new string.
	pub fn set_string(&mut self, value: String) -> Result<()> {
		if let ReflectMut::Pointer(pointer) = self.cursor_mut().reflect_mut() {
			return pointer
				.point_to(Box::new(value))
				.map_err(|rejected| not_assignable(pointer.pointee_type_name(), &*rejected));
		}
		self.store_scalar(Kind::String, |slot| slot.set_string(value))
	}

	/// Store a boolean at the cursor.
	pub fn set_bool(&mut self, value: bool) -> Result<()> {
		self.store_scalar(Kind::Bool, |slot| slot.set_bool(value))
	}

	/// Store a float at the cursor, rounding to `f32` when the slot is one.
	pub fn set_float(&mut self, value: f64) -> Result<()> {
		self.store_scalar(Kind::Float, |slot| slot.set_float(value))
	}

	/// Store a signed integer at the cursor, truncating to the slot width.
	pub fn set_int(&mut self, value: i64) -> Result<()> {
		self.store_scalar(Kind::Int, |slot| slot.set_int(value))
	}

	/// Replace the value at the cursor with `value`, which must have the same concrete type.
	///
	/// Interface slots accept any type.
	pub fn set(&mut self, value: Box<dyn Reflect>) -> Result<()> {
		let target = self.cursor_mut();
		target.assign(value).map_err(|rejected| not_assignable(target.type_name(), &*rejected))
	}

	/// Typed convenience over [`set`](Self::set).
	pub fn set_value<T: Reflect>(&mut self, value: T) -> Result<()> {
		self.set(Box::new(value))
	}

	fn frame_paths(&self) -> impl Iterator<Item = &CursorPath> {
		self.saved.iter().chain(iter::once(&self.current))
	}

	/// Frames as `[type (value) | type (value)]`, outermost first.
	pub fn dump(&self) -> String {
		let frames: Vec<String> = self
			.frame_paths()
			.map(|path| {
				let value = frame(&*self.root, path);
				format!("{} ({})", short_type_name(value.type_name()), render(value))
			})
			.collect();
		format!("[{}]", frames.join(" | "))
	}

	/// Snapshot of every frame, outermost first.
	pub fn frames(&self) -> Vec<FrameSnapshot> {
		self.frame_paths()
			.enumerate()
			.map(|(depth, path)| {
				let value = frame(&*self.root, path);
				FrameSnapshot {
					depth,
					path: path::display(path),
					kind: value.kind(),
					type_name: short_type_name(value.type_name()),
					value: render(value),
				}
			})
			.collect()
	}
}

#[cfg(test)]
mod tests;
