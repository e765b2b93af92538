//! Fixture records shared by the scenario tests.

#![allow(dead_code)]

reflectbuild::record! {
	#[derive(Debug, Default, Clone, PartialEq)]
	pub struct Article {
		pub name: String [json = "Name"],
		pub tags: Vec<String> [json = "Tags"],
	}
}

reflectbuild::record! {
	#[derive(Debug, Default, Clone, PartialEq)]
	pub struct Identity {
		pub id: i64 [json = "ID"],
		pub revision: u32,
	}
}

reflectbuild::record! {
	#[derive(Debug, Default, Clone, PartialEq)]
	pub struct Audit {
		pub author: Option<String> [json = "Author"],
	}
}

reflectbuild::record! {
	#[derive(Debug, Default, Clone, PartialEq)]
	pub struct Document {
		#[embed]
		pub identity: Identity,
		#[embed]
		pub audit: Option<Box<Audit>>,
		pub title: String [json = "Title"],
		pub sections: Vec<Section> [json = "Sections"],
		pub ratio: f64,
		pub draft: bool,
		owner: String,
	}
}

reflectbuild::record! {
	#[derive(Debug, Default, Clone, PartialEq)]
	pub struct Section {
		pub heading: String,
		pub notes: Option<Vec<String>>,
		pub refs: Vec<Option<Identity>>,
	}
}

impl Document {
	pub fn owned_by(owner: &str) -> Self {
		Self {
			owner: owner.to_owned(),
			..Self::default()
		}
	}

	pub fn owner(&self) -> &str {
		&self.owner
	}
}
