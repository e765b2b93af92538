use std::any::TypeId;

/// Static descriptor of a record type.
///
/// Normally generated by [`record!`](crate::record); the fields are public so the
/// macro can build it in a `static` inside downstream crates.
#[derive(Debug)]
pub struct RecordInfo {
	/// Declared type name.
	pub name: &'static str,
	/// Type identity of the record.
	pub id: fn() -> TypeId,
	/// Fields in declaration order.
	pub fields: &'static [FieldInfo],
}

impl RecordInfo {
	/// Type identity of the record.
	pub fn id(&self) -> TypeId {
		(self.id)()
	}

	/// Look up a field by declared name.
	pub fn field_by_name(&self, name: &str) -> Option<(usize, &'static FieldInfo)> {
		self.fields.iter().enumerate().find(|(_, field)| field.name == name)
	}
}

/// Static descriptor of one record field.
#[derive(Debug)]
pub struct FieldInfo {
	/// Declared field name.
	pub name: &'static str,
	/// Metadata annotations as `(key, value)` pairs.
	pub tags: &'static [(&'static str, &'static str)],
	/// Whether the field carries a visibility qualifier.
	pub exported: bool,
	/// Descriptor of the embedded record, for embedded fields.
	pub embedded: Option<fn() -> &'static RecordInfo>,
}

impl FieldInfo {
	/// Value of the metadata annotation `key`.
	pub fn tag(&self, key: &str) -> Option<&'static str> {
		self.tags.iter().find(|(name, _)| *name == key).map(|(_, value)| *value)
	}

	/// Whether the field's own fields are flattened into its parent.
	pub fn is_embedded(&self) -> bool {
		self.embedded.is_some()
	}
}

/// Types whose fields can be flattened into an embedding record.
///
/// Implemented by [`record!`](crate::record) for every record, and forwarded
/// through `Option<T>` and `Box<T>` so optional embeddings resolve too.
pub trait Embed {
	/// Descriptor of the embedded record type.
	fn embedded_info() -> &'static RecordInfo;
}

impl<T: Embed> Embed for Option<T> {
	fn embedded_info() -> &'static RecordInfo {
		T::embedded_info()
	}
}

impl<T: Embed> Embed for Box<T> {
	fn embedded_info() -> &'static RecordInfo {
		T::embedded_info()
	}
}

/// Define a struct together with its [`RecordInfo`] and `Reflect` implementation.
///
/// Fields with a visibility qualifier are addressable; private fields are
/// reflected but never resolved by name. A field marked `#[embed]` must be a
/// record (or `Option`/`Box` of one) and contributes its own fields to the
/// parent's namespace. Metadata annotations follow the field type in
/// brackets. Other field attributes, doc comments included, are kept on the
/// generated struct.
///
/// ```
/// reflectbuild::record! {
/// 	#[derive(Debug, Default)]
/// 	pub struct Meta {
/// 		pub id: i64,
/// 	}
/// }
///
/// reflectbuild::record! {
/// 	#[derive(Debug, Default)]
/// 	pub struct Profile {
/// 		/// Display name.
/// 		pub name: String [json = "full_name"],
/// 		pub tags: Vec<String>,
/// 		/// Shared metadata.
/// 		#[embed]
/// 		pub meta: Meta,
/// 		secret: String,
/// 	}
/// }
///
/// let mut profile = Profile::default();
/// let mut nav = reflectbuild::Navigator::new("json", &mut profile);
/// nav.dig_field("full_name").unwrap();
/// nav.set_string("alice".to_owned()).unwrap();
/// nav.reset();
/// nav.dig_field("id").unwrap();
/// nav.set_int(7).unwrap();
/// drop(nav);
/// assert_eq!(profile.name, "alice");
/// assert_eq!(profile.meta.id, 7);
/// ```
///
/// Generic structs are not supported.
#[macro_export]
macro_rules! record {
	(@munch $head:tt [$($acc:tt)*]) => {
		$crate::record!(@emit $head $($acc)*);
	};
	(@munch $head:tt [$($acc:tt)*] $($rest:tt)+) => {
		$crate::record!(@field $head [$($acc)*] [] plain $($rest)+);
	};
	(@field $head:tt [$($acc:tt)*] [$($fattr:tt)*] $mode:ident #[embed] $($rest:tt)*) => {
		$crate::record!(@field $head [$($acc)*] [$($fattr)*] embed $($rest)*);
	};
	(@field $head:tt [$($acc:tt)*] [$($fattr:tt)*] $mode:ident #[$attr:meta] $($rest:tt)*) => {
		$crate::record!(@field $head [$($acc)*] [$($fattr)* #[$attr]] $mode $($rest)*);
	};
	(@field $head:tt [$($acc:tt)*] [$($fattr:tt)*] $mode:ident $fvis:vis $field:ident : $ty:ty $([$($key:ident = $value:literal),* $(,)?])? $(, $($rest:tt)*)?) => {
		$crate::record!(@munch $head [$($acc)* ($mode [$($fattr)*] $fvis $field $ty [$($($key = $value),*)?])] $($($rest)*)?);
	};
	(@emit [$(#[$attr:meta])* $vis:vis struct $name:ident] $(($mode:ident [$($fattr:tt)*] $fvis:vis $field:ident $ty:ty [$($key:ident = $value:literal),*]))*) => {
		$(#[$attr])*
		$vis struct $name {
			$($($fattr)* $fvis $field: $ty,)*
		}

		impl $crate::Embed for $name {
			fn embedded_info() -> &'static $crate::RecordInfo {
				static INFO: $crate::RecordInfo = $crate::RecordInfo {
					name: ::std::stringify!($name),
					id: ::std::any::TypeId::of::<$name>,
					fields: &[$(
						$crate::FieldInfo {
							name: ::std::stringify!($field),
							tags: &[$((::std::stringify!($key), $value)),*],
							exported: !::std::stringify!($fvis).is_empty(),
							embedded: $crate::record!(@embedded $mode $ty),
						}
					),*],
				};
				&INFO
			}
		}

		impl $crate::Record for $name {
			fn info(&self) -> &'static $crate::RecordInfo {
				<Self as $crate::Embed>::embedded_info()
			}

			fn field(&self, index: usize) -> ::std::option::Option<&dyn $crate::Reflect> {
				let fields: [&dyn $crate::Reflect; $crate::record!(@count $($field)*)] = [$(&self.$field),*];
				::std::iter::IntoIterator::into_iter(fields).nth(index)
			}

			fn field_mut(&mut self, index: usize) -> ::std::option::Option<&mut dyn $crate::Reflect> {
				let fields: [&mut dyn $crate::Reflect; $crate::record!(@count $($field)*)] = [$(&mut self.$field),*];
				::std::iter::IntoIterator::into_iter(fields).nth(index)
			}
		}

		impl $crate::Reflect for $name {
			fn kind(&self) -> $crate::Kind {
				$crate::Kind::Record
			}

			fn reflect_ref(&self) -> $crate::ReflectRef<'_> {
				$crate::ReflectRef::Record(self)
			}

			fn reflect_mut(&mut self) -> $crate::ReflectMut<'_> {
				$crate::ReflectMut::Record(self)
			}

			fn type_kind() -> $crate::Kind {
				$crate::Kind::Record
			}

			$crate::__reflect_boilerplate!();
			$crate::__reflect_assign!();
		}
	};
	(@embedded embed $ty:ty) => {
		::std::option::Option::Some(<$ty as $crate::Embed>::embedded_info as fn() -> &'static $crate::RecordInfo)
	};
	(@embedded plain $ty:ty) => {
		::std::option::Option::None
	};
	(@count) => {
		0usize
	};
	(@count $head:ident $($tail:ident)*) => {
		1usize + $crate::record!(@count $($tail)*)
	};
	(
		$(#[$attr:meta])*
		$vis:vis struct $name:ident {
			$($body:tt)*
		}
	) => {
		$crate::record!(@munch [$(#[$attr])* $vis struct $name] [] $($body)*);
	};
}
