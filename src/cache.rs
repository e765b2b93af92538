use std::any::TypeId;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use log::{debug, trace};
use smallvec::SmallVec;

use crate::reflect::{deref_record, deref_record_mut};
use crate::{BuildError, FieldInfo, Record, RecordInfo, Reflect, Result};

/// What to do when two fields of one record resolve to the same address key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
	/// The field registered last silently replaces earlier ones.
	#[default]
	LastWins,
	/// Building the record's field map fails with [`BuildError::AmbiguousField`].
	Reject,
}

/// Configuration for field-name resolution.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
	/// Metadata annotation whose value overrides a field's declared name.
	pub name_tag: Option<String>,
	/// Handling of address-key collisions.
	pub on_collision: CollisionPolicy,
}

impl ResolveOptions {
	/// Options resolving names through the metadata annotation `tag`.
	pub fn with_name_tag(tag: impl Into<String>) -> Self {
		Self {
			name_tag: Some(tag.into()),
			..Self::default()
		}
	}

	/// Address key of `field` under these options.
	pub fn address_of(&self, field: &FieldInfo) -> &'static str {
		self.name_tag.as_deref().and_then(|tag| field.tag(tag)).unwrap_or(field.name)
	}
}

/// Accessor for one addressable field, possibly inside embedded records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAccessor {
	name: Arc<str>,
	indices: Arc<[usize]>,
}

impl FieldAccessor {
	fn new(name: &str, indices: &[usize]) -> Self {
		Self {
			name: Arc::from(name),
			indices: Arc::from(indices),
		}
	}

	/// Address key this accessor was registered under.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Declaration indices from the outer record down to the field.
	pub fn indices(&self) -> &[usize] {
		&self.indices
	}

	/// Whether the field lives inside an embedded record.
	pub fn is_promoted(&self) -> bool {
		self.indices.len() > 1
	}

	/// Field slot on `record`, or `None` when an embedded pointer on the way is nil.
	pub fn get<'v>(&self, record: &'v dyn Record) -> Option<&'v dyn Reflect> {
		let (last, parents) = self.indices.split_last()?;
		let mut current = record;
		for &index in parents {
			current = deref_record(current.field(index)?)?;
		}
		current.field(*last)
	}

	/// Mutable field slot on `record`, or `None` when an embedded pointer on the way is nil.
	pub fn get_mut<'v>(&self, record: &'v mut dyn Record) -> Option<&'v mut dyn Reflect> {
		let (last, parents) = self.indices.split_last()?;
		let mut current = record;
		for &index in parents {
			current = deref_record_mut(current.field_mut(index)?)?;
		}
		current.field_mut(*last)
	}
}

/// Address key to accessor mapping for one record type.
#[derive(Debug, Clone)]
pub struct FieldMap {
	record: &'static str,
	fields: HashMap<Arc<str>, FieldAccessor>,
}

impl FieldMap {
	/// Walk `info` and its embedded records, registering every exported field.
	pub fn build(info: &'static RecordInfo, options: &ResolveOptions) -> Result<Self> {
		trace!("building field map for {}", info.name);
		let mut map = Self {
			record: info.name,
			fields: HashMap::with_capacity(info.fields.len()),
		};
		let mut visiting = vec![info.id()];
		map.collect(info, &mut SmallVec::new(), &mut visiting, options)?;
		Ok(map)
	}

	fn collect(&mut self, info: &'static RecordInfo, prefix: &mut SmallVec<[usize; 4]>, visiting: &mut Vec<TypeId>, options: &ResolveOptions) -> Result<()> {
		for (index, field) in info.fields.iter().enumerate() {
			if !field.exported {
				continue;
			}

			prefix.push(index);
			if let Some(embedded) = field.embedded {
				let embedded = embedded();
				let id = embedded.id();
				if visiting.contains(&id) {
					trace!("{} re-embeds {}; not walked again", info.name, embedded.name);
				} else {
					visiting.push(id);
					self.collect(embedded, prefix, visiting, options)?;
					visiting.pop();
				}
			} else {
				self.insert(options.address_of(field), prefix.as_slice(), options)?;
			}
			prefix.pop();
		}
		Ok(())
	}

	fn insert(&mut self, key: &'static str, indices: &[usize], options: &ResolveOptions) -> Result<()> {
		let accessor = FieldAccessor::new(key, indices);
		if let Some(previous) = self.fields.insert(Arc::clone(&accessor.name), accessor) {
			match options.on_collision {
				CollisionPolicy::LastWins => {
					debug!("{}: field '{}' at {:?} overrides {:?}", self.record, key, indices, previous.indices());
				}
				CollisionPolicy::Reject => {
					return Err(BuildError::AmbiguousField {
						field: key.to_owned(),
						record: self.record.to_owned(),
					});
				}
			}
		}
		Ok(())
	}

	/// Accessor registered under `name`.
	pub fn get(&self, name: &str) -> Option<&FieldAccessor> {
		self.fields.get(name)
	}

	/// Number of addressable fields.
	pub fn len(&self) -> usize {
		self.fields.len()
	}

	/// Whether the record has no addressable field.
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Address keys in sorted order.
	pub fn names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.fields.keys().map(|name| name.as_ref()).collect();
		names.sort_unstable();
		names
	}
}

/// Memoized field maps, one per record type.
///
/// Scoped to whoever owns it (normally one [`Navigator`](crate::Navigator));
/// population is not synchronized.
#[derive(Debug, Default)]
pub struct ResolutionCache {
	options: ResolveOptions,
	maps: HashMap<TypeId, FieldMap>,
}

impl ResolutionCache {
	/// Empty cache resolving names under `options`.
	pub fn new(options: ResolveOptions) -> Self {
		Self {
			options,
			maps: HashMap::new(),
		}
	}

	/// Resolution options in effect.
	pub fn options(&self) -> &ResolveOptions {
		&self.options
	}

	/// Field map of the record type described by `info`, built on first use.
	pub fn field_map(&mut self, info: &'static RecordInfo) -> Result<&FieldMap> {
		let map = match self.maps.entry(info.id()) {
			Entry::Occupied(entry) => entry.into_mut(),
			Entry::Vacant(entry) => entry.insert(FieldMap::build(info, &self.options)?),
		};
		Ok(&*map)
	}

	/// Accessor for `name` on the record type described by `info`.
	pub fn resolve(&mut self, info: &'static RecordInfo, name: &str) -> Result<Option<FieldAccessor>> {
		Ok(self.field_map(info)?.get(name).cloned())
	}

	/// Number of record types memoized so far.
	pub fn len(&self) -> usize {
		self.maps.len()
	}

	/// Whether nothing has been memoized yet.
	pub fn is_empty(&self) -> bool {
		self.maps.is_empty()
	}

	/// Whether the record type `id` has been memoized.
	pub fn contains(&self, id: TypeId) -> bool {
		self.maps.contains_key(&id)
	}
}
