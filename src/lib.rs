//! Reflection-driven cursor navigation and in-place mutation of structured values.
//!
//! Records declared with [`record!`] expose their fields by name (or by a
//! metadata annotation), embedded records flatten into their parent, and a
//! [`Navigator`] moves a cursor through the value to write leaves without
//! knowing its concrete shape.

mod cache;
mod error;
mod impls;
mod kind;
mod navigator;
mod path;
mod record;
mod reflect;
mod render;

/// Field-name resolution configuration and memoized field maps.
pub use cache::{CollisionPolicy, FieldAccessor, FieldMap, ResolutionCache, ResolveOptions};
/// Error and result aliases.
pub use error::{BuildError, Result};
/// Type-erased value wrapper.
pub use impls::Dynamic;
/// Runtime value categories.
pub use kind::Kind;
/// Cursor over a mutably borrowed value.
pub use navigator::{FrameSnapshot, Navigator};
/// Cursor frame steps.
pub use path::PathStep;
/// Static record descriptors.
pub use record::{Embed, FieldInfo, RecordInfo};
/// Reflection traits, views and helpers.
pub use reflect::{List, Pointer, Record, Reflect, ReflectMut, ReflectRef, ScalarMut, Sequence, deref, deref_mut, take};
/// Diagnostic rendering helpers.
pub use render::{Render, render, short_type_name};
