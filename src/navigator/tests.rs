mod unit_navigator_stack {

	use crate::{BuildError, Kind, Navigator, PathStep, ResolveOptions};

	crate::record! {
		#[derive(Debug, Default, Clone, PartialEq)]
		pub struct Point {
			pub x: i32,
			pub y: i32,
		}
	}

	crate::record! {
		#[derive(Debug, Default, Clone, PartialEq)]
		pub struct Shape {
			pub name: String,
			pub origin: Point,
			pub corner: Option<Box<Point>>,
		}
	}

	#[test]
	fn dig_replaces_the_top_frame() {
		let mut shape = Shape::default();
		let mut nav = Navigator::with_options(ResolveOptions::default(), &mut shape);
		nav.dig_field("origin").expect("origin exists");
		nav.dig_field("x").expect("x exists");
		assert_eq!(nav.depth(), 1);
		assert_eq!(nav.cursor().kind(), Kind::Int);
		nav.set_int(5).expect("int slot");
		drop(nav);
		assert_eq!(shape.origin.x, 5);
	}

	#[test]
	fn save_then_load_restores_position() {
		let mut shape = Shape::default();
		let mut nav = Navigator::with_options(ResolveOptions::default(), &mut shape);
		nav.dig_field("origin").expect("origin exists");
		let before = nav.frames();

		nav.save();
		assert_eq!(nav.depth(), 2);
		nav.dig_field("y").expect("y exists");
		nav.set_int(-1).expect("int slot");
		nav.load();

		assert_eq!(nav.depth(), 1);
		assert_eq!(nav.cursor().kind(), Kind::Record);
		assert_eq!(nav.frames()[0].path, before[0].path);
		nav.dig_field("x").expect("x exists from the restored record");
		drop(nav);
		assert_eq!(shape.origin.y, -1);
	}

	#[test]
	fn bare_save_and_load_change_nothing() {
		let mut shape = Shape {
			name: "square".to_owned(),
			corner: Some(Box::new(Point { x: 1, y: 1 })),
			..Shape::default()
		};
		let original = shape.clone();
		let mut nav = Navigator::with_options(ResolveOptions::default(), &mut shape);
		nav.dig_field("corner").expect("corner exists");
		let before = nav.frames();
		let path = nav.path().to_vec();

		nav.save();
		nav.load();

		assert_eq!(nav.frames(), before);
		assert_eq!(nav.path(), path.as_slice());
		assert_eq!(nav.depth(), 1);
		drop(nav);
		assert_eq!(shape, original);
	}

	#[test]
	fn reset_collapses_to_root() {
		let mut shape = Shape::default();
		let mut nav = Navigator::with_options(ResolveOptions::default(), &mut shape);
		nav.save();
		nav.dig_field("origin").expect("origin exists");
		nav.save();
		nav.dig_field("x").expect("x exists");
		nav.reset();
		assert_eq!(nav.depth(), 1);
		assert_eq!(nav.frames()[0].path, ".");
		assert_eq!(nav.frames()[0].type_name, "Shape");
	}

	#[test]
	#[should_panic(expected = "already at root")]
	fn load_at_root_panics() {
		let mut shape = Shape::default();
		let mut nav = Navigator::with_options(ResolveOptions::default(), &mut shape);
		nav.load();
	}

	#[test]
	fn unknown_field_leaves_cursor_unchanged() {
		let mut shape = Shape::default();
		let mut nav = Navigator::with_options(ResolveOptions::default(), &mut shape);
		nav.dig_field("origin").expect("origin exists");
		let before = nav.frames();

		let err = nav.dig_field("z").expect_err("no z on Point");
		assert_eq!(
			err,
			BuildError::FieldNotFound {
				field: "z".to_owned(),
				record: "Point".to_owned(),
				value: "Point { x: 0, y: 0 }".to_owned(),
			}
		);
		assert_eq!(nav.frames(), before);
	}

	#[test]
	fn dig_on_leaf_is_incorrect_kind() {
		let mut shape = Shape::default();
		let mut nav = Navigator::with_options(ResolveOptions::default(), &mut shape);
		nav.dig_field("name").expect("name exists");
		assert_eq!(
			nav.dig_field("len"),
			Err(BuildError::IncorrectKind {
				actual: Kind::String,
				expected: Kind::Record,
			})
		);
	}

	#[test]
	fn dig_through_nil_pointer_reports_pointer_kind() {
		let mut shape = Shape::default();
		let mut nav = Navigator::with_options(ResolveOptions::default(), &mut shape);
		nav.dig_field("corner").expect("corner exists");
		assert_eq!(
			nav.dig_field("x"),
			Err(BuildError::IncorrectKind {
				actual: Kind::Pointer,
				expected: Kind::Record,
			})
		);
	}

	#[test]
	fn dig_follows_present_pointers() {
		let mut shape = Shape {
			corner: Some(Box::new(Point { x: 1, y: 2 })),
			..Shape::default()
		};
		let mut nav = Navigator::with_options(ResolveOptions::default(), &mut shape);
		nav.dig_field("corner").expect("corner exists");
		nav.dig_field("y").expect("through Option<Box<_>>");
		assert_eq!(nav.frames()[0].path, ".corner.y");
		assert_eq!(nav.path().len(), 4);
		assert_eq!(nav.path()[1], PathStep::Deref);
		nav.set_int(20).expect("int slot");
		drop(nav);
		assert_eq!(shape.corner.map(|corner| corner.y), Some(20));
	}

	#[test]
	fn dump_lists_frames_outermost_first() {
		let mut point = Point { x: 3, y: 4 };
		let mut nav = Navigator::with_options(ResolveOptions::default(), &mut point);
		nav.save();
		nav.dig_field("y").expect("y exists");
		assert_eq!(nav.dump(), "[Point (Point { x: 3, y: 4 }) | i32 (4)]");
	}

	#[test]
	fn cache_survives_into_the_next_navigator() {
		let mut first = Point::default();
		let mut nav = Navigator::with_options(ResolveOptions::default(), &mut first);
		nav.dig_field("x").expect("x exists");
		let cache = nav.into_cache();
		assert_eq!(cache.len(), 1);

		let mut second = Point::default();
		let mut nav = Navigator::with_cache(cache, &mut second);
		nav.dig_field("y").expect("y exists");
		assert_eq!(nav.cache().len(), 1);
	}
}

mod unit_navigator_construction {

	use crate::{BuildError, Kind, Navigator, Reflect, ResolveOptions};

	crate::record! {
		#[derive(Debug, Default)]
		pub struct Config {
			pub port: u16,
			pub host: String,
		}
	}

	#[test]
	fn from_pointer_builds_the_pointee() {
		let mut slot: Option<Config> = Some(Config::default());
		let mut nav = Navigator::from_pointer(ResolveOptions::default(), &mut slot).expect("non-nil pointer");
		assert_eq!(nav.cursor().kind(), Kind::Record);
		nav.dig_field("host").expect("host exists");
		nav.set_string("localhost".to_owned()).expect("string slot");
		nav.reset();
		assert_eq!(nav.cursor().kind(), Kind::Record);
		drop(nav);
		assert_eq!(slot.map(|config| config.host).as_deref(), Some("localhost"));
	}

	#[test]
	fn from_pointer_rejects_nil_and_non_pointers() {
		let mut nil: Option<Config> = None;
		assert_eq!(
			Navigator::from_pointer(ResolveOptions::default(), &mut nil).map(|_| ()),
			Err(BuildError::NilRoot)
		);

		let mut bare = Config::default();
		let root: &mut dyn Reflect = &mut bare;
		assert_eq!(
			Navigator::from_pointer(ResolveOptions::default(), root).map(|_| ()),
			Err(BuildError::NotAPointer { kind: Kind::Record })
		);
	}

	#[test]
	fn error_messages_name_kinds() {
		let err = BuildError::NotAPointer { kind: Kind::Record };
		assert_eq!(err.to_string(), "cannot build a record: need a pointer");
		let err = BuildError::IncorrectKind {
			actual: Kind::Uint,
			expected: Kind::Int,
		};
		assert_eq!(err.to_string(), "incorrect kind: expected 'int', got 'uint'");
	}
}

mod unit_navigator_slices {

	use crate::{BuildError, Kind, Navigator, ResolveOptions};

	crate::record! {
		#[derive(Debug, Default, Clone, PartialEq)]
		pub struct Tag {
			pub label: String,
		}
	}

	crate::record! {
		#[derive(Debug, Default, Clone, PartialEq)]
		pub struct Draft {
			pub title: String,
			pub score: i32,
			pub published: bool,
			pub tags: Vec<Tag>,
			pub cover: Option<Tag>,
		}
	}

	crate::record! {
		#[derive(Debug, Default)]
		pub struct Post {
			pub drafts: Vec<Draft>,
			pub tags: Vec<Tag>,
			pub pinned: Vec<Option<Tag>>,
			pub lazy: Option<Vec<Tag>>,
			pub grid: [u8; 3],
			pub words: Vec<String>,
		}
	}

	fn tag(label: &str) -> Tag {
		Tag { label: label.to_owned() }
	}

	#[test]
	fn slice_new_elem_appends_default_and_moves_to_it() {
		let mut post = Post {
			tags: vec![tag("a")],
			..Post::default()
		};
		let mut nav = Navigator::with_options(ResolveOptions::default(), &mut post);
		nav.dig_field("tags").expect("tags exists");
		nav.slice_new_elem().expect("slice");
		assert_eq!(nav.frames()[0].path, ".tags[1]");
		assert_eq!(nav.cursor().kind(), Kind::Record);
		nav.dig_field("label").expect("label exists");
		nav.set_string("b".to_owned()).expect("string slot");
		drop(nav);
		assert_eq!(post.tags, vec![tag("a"), tag("b")]);
	}

	#[test]
	fn new_element_is_zero_valued_before_any_write() {
		let existing = Draft {
			title: "kept".to_owned(),
			score: 3,
			published: true,
			tags: vec![tag("t")],
			cover: Some(tag("c")),
		};
		let mut post = Post {
			drafts: vec![existing.clone(), existing.clone()],
			..Post::default()
		};
		let mut nav = Navigator::with_options(ResolveOptions::default(), &mut post);
		nav.dig_field("drafts").expect("drafts exists");
		nav.slice_new_elem().expect("slice");
		assert_eq!(nav.frames()[0].path, ".drafts[2]");
		assert_eq!(nav.cursor().as_any().downcast_ref::<Draft>(), Some(&Draft::default()));
		drop(nav);
		assert_eq!(post.drafts, vec![existing.clone(), existing, Draft::default()]);
	}

	#[test]
	fn slice_last_or_create_reuses_the_last_element() {
		let mut post = Post::default();
		let mut nav = Navigator::with_options(ResolveOptions::default(), &mut post);
		nav.dig_field("words").expect("words exists");
		nav.save();
		nav.slice_last_or_create().expect("creates");
		nav.set_string("one".to_owned()).expect("string slot");
		nav.load();
		nav.slice_last_or_create().expect("reuses");
		assert_eq!(nav.frames()[0].path, ".words[0]");
		nav.set_string("uno".to_owned()).expect("string slot");
		drop(nav);
		assert_eq!(post.words, ["uno"]);
	}

	#[test]
	fn slice_operations_reject_arrays() {
		let mut post = Post::default();
		let mut nav = Navigator::with_options(ResolveOptions::default(), &mut post);
		nav.dig_field("grid").expect("grid exists");
		let expected = Err(BuildError::IncorrectKind {
			actual: Kind::Array,
			expected: Kind::Slice,
		});
		assert_eq!(nav.slice_new_elem(), expected);
		assert_eq!(nav.slice_last_or_create(), expected);
		assert!(!nav.is_slice());
		nav.last();
		assert_eq!(nav.frames()[0].path, ".grid[2]");
		assert_eq!(nav.cursor().kind(), Kind::Uint);
	}

	#[test]
	fn last_is_a_no_op_on_empty_slices_and_leaves() {
		let mut post = Post::default();
		let mut nav = Navigator::with_options(ResolveOptions::default(), &mut post);
		nav.dig_field("words").expect("words exists");
		nav.last();
		assert_eq!(nav.frames()[0].path, ".words");
		nav.reset();
		nav.last();
		assert_eq!(nav.frames()[0].path, ".");
	}

	#[test]
	fn slice_append_moves_pointee_into_value_slices() {
		let mut post = Post::default();
		let mut nav = Navigator::with_options(ResolveOptions::default(), &mut post);
		nav.dig_field("tags").expect("tags exists");
		nav.slice_append(Box::new(Some(tag("x")))).expect("append");
		nav.slice_append(Box::new(Box::new(tag("y")))).expect_err("cursor is on the new element, not the slice");
		assert_eq!(nav.frames()[0].path, ".tags[0]");
		drop(nav);
		assert_eq!(post.tags, [tag("x")]);
	}

	#[test]
	fn slice_append_keeps_pointers_for_pointer_slices() {
		let mut post = Post::default();
		let mut nav = Navigator::with_options(ResolveOptions::default(), &mut post);
		nav.dig_field("pinned").expect("pinned exists");
		nav.slice_append(Box::new(Some(tag("p")))).expect("append");
		assert_eq!(nav.cursor().kind(), Kind::Pointer);
		drop(nav);
		assert_eq!(post.pinned, [Some(tag("p"))]);
	}

	#[test]
	fn slice_append_allocates_nil_slice_pointer() {
		let mut post = Post::default();
		let mut nav = Navigator::with_options(ResolveOptions::default(), &mut post);
		nav.dig_field("lazy").expect("lazy exists");
		assert!(nav.is_slice_or_pointer_to_slice());
		assert!(!nav.is_slice());
		nav.slice_append(Box::new(Some(tag("z")))).expect("append");
		assert_eq!(nav.frames()[0].path, ".lazy[0]");
		drop(nav);
		assert_eq!(post.lazy, Some(vec![tag("z")]));
	}

	#[test]
	fn slice_append_of_wrong_type_is_not_assignable() {
		let mut post = Post::default();
		let mut nav = Navigator::with_options(ResolveOptions::default(), &mut post);
		nav.dig_field("words").expect("words exists");
		let err = nav.slice_append(Box::new(Some(7_i32))).expect_err("i32 into Vec<String>");
		assert_eq!(
			err,
			BuildError::NotAssignable {
				target: "String".to_owned(),
				value: "i32".to_owned(),
			}
		);
		assert_eq!(nav.frames()[0].path, ".words");
	}

	#[test]
	#[should_panic(expected = "should be a pointer")]
	fn slice_append_of_non_pointer_panics() {
		let mut post = Post::default();
		let mut nav = Navigator::with_options(ResolveOptions::default(), &mut post);
		nav.dig_field("words").expect("words exists");
		let _ = nav.slice_append(Box::new("bare".to_owned()));
	}

	#[test]
	#[should_panic(expected = "cannot append nil")]
	fn slice_append_of_nil_pointer_panics() {
		let mut post = Post::default();
		let mut nav = Navigator::with_options(ResolveOptions::default(), &mut post);
		nav.dig_field("tags").expect("tags exists");
		let _ = nav.slice_append(Box::new(None::<Tag>));
	}
}

mod unit_navigator_setters {

	use crate::{BuildError, Dynamic, Kind, Navigator, ResolveOptions};

	crate::record! {
		#[derive(Debug, Default)]
		pub struct Bag {
			pub values: Vec<Dynamic>,
			pub extra: Option<Dynamic>,
		}
	}

	crate::record! {
		#[derive(Debug, Default)]
		pub struct Sample {
			pub text: String,
			pub maybe: Option<String>,
			pub flag: bool,
			pub small: i8,
			pub unsigned: u32,
			pub ratio: f32,
			pub any: Option<Box<i64>>,
		}
	}

	fn at<'a>(sample: &'a mut Sample, field: &str) -> Navigator<'a> {
		let mut nav = Navigator::with_options(ResolveOptions::default(), sample);
		nav.dig_field(field).expect("field exists");
		nav
	}

	#[test]
	fn setters_store_matching_kinds() {
		let mut sample = Sample::default();
		at(&mut sample, "text").set_string("t".to_owned()).expect("string");
		at(&mut sample, "flag").set_bool(true).expect("bool");
		at(&mut sample, "small").set_int(1000).expect("int");
		at(&mut sample, "ratio").set_float(0.25).expect("float");
		assert_eq!(sample.text, "t");
		assert!(sample.flag);
		assert_eq!(sample.small, 1000_i64 as i8);
		assert_eq!(sample.ratio, 0.25);
	}

	#[test]
	fn setters_reject_other_kinds() {
		let mut sample = Sample::default();
		assert_eq!(
			at(&mut sample, "unsigned").set_int(1),
			Err(BuildError::IncorrectKind {
				actual: Kind::Uint,
				expected: Kind::Int,
			})
		);
		assert_eq!(
			at(&mut sample, "text").set_bool(true),
			Err(BuildError::IncorrectKind {
				actual: Kind::String,
				expected: Kind::Bool,
			})
		);
		assert_eq!(
			at(&mut sample, "flag").set_float(1.0),
			Err(BuildError::IncorrectKind {
				actual: Kind::Bool,
				expected: Kind::Float,
			})
		);
		assert_eq!(
			at(&mut sample, "small").set_string("1".to_owned()),
			Err(BuildError::IncorrectKind {
				actual: Kind::Int,
				expected: Kind::String,
			})
		);
	}

	#[test]
	fn set_string_allocates_optional_strings() {
		let mut sample = Sample::default();
		at(&mut sample, "maybe").set_string("present".to_owned()).expect("pointer to string");
		assert_eq!(sample.maybe.as_deref(), Some("present"));

		let err = at(&mut sample, "any").set_string("nope".to_owned()).expect_err("pointer to i64");
		assert_eq!(
			err,
			BuildError::NotAssignable {
				target: "Box<i64>".to_owned(),
				value: "String".to_owned(),
			}
		);
	}

	#[test]
	fn set_replaces_values_of_the_same_type() {
		let mut sample = Sample::default();
		at(&mut sample, "any").set_value(Some(Box::new(9_i64))).expect("same type");
		assert_eq!(sample.any.as_deref(), Some(&9));

		let err = at(&mut sample, "unsigned").set_value(9_u64).expect_err("u64 into u32");
		assert_eq!(
			err,
			BuildError::NotAssignable {
				target: "u32".to_owned(),
				value: "u64".to_owned(),
			}
		);
	}

	#[test]
	fn set_on_interface_accepts_any_value() {
		let mut erased = Dynamic::new(0_i32);
		let mut nav = Navigator::with_options(ResolveOptions::default(), &mut erased);
		nav.set_value("text".to_owned()).expect("interfaces accept anything");
		assert_eq!(nav.cursor().kind(), Kind::Interface);
		drop(nav);
		assert_eq!(erased.downcast_ref::<String>().map(String::as_str), Some("text"));
	}

	#[test]
	fn slices_of_interfaces_are_built_element_by_element() {
		let mut bag = Bag::default();
		let mut nav = Navigator::with_options(ResolveOptions::default(), &mut bag);
		nav.dig_field("values").expect("values exists");
		nav.save();
		nav.slice_new_elem().expect("slice of interfaces");
		assert_eq!(nav.cursor().kind(), Kind::Interface);
		assert_eq!(nav.frames()[1].value, "nil");
		nav.set_value(7_i64).expect("interfaces accept anything");
		nav.load();
		nav.slice_append(Box::new(Some("two".to_owned()))).expect("pointee moved into the interface");
		assert_eq!(nav.frames()[0].path, ".values[1]");
		drop(nav);

		assert_eq!(bag.values.len(), 2);
		assert_eq!(bag.values[0].downcast_ref::<i64>(), Some(&7));
		assert_eq!(bag.values[1].downcast_ref::<String>().map(String::as_str), Some("two"));
	}

	#[test]
	fn dig_into_nil_interface_reports_interface_kind() {
		let mut bag = Bag::default();
		let mut nav = Navigator::with_options(ResolveOptions::default(), &mut bag);
		nav.dig_field("values").expect("values exists");
		nav.slice_new_elem().expect("slice of interfaces");
		assert_eq!(
			nav.dig_field("anything"),
			Err(BuildError::IncorrectKind {
				actual: Kind::Interface,
				expected: Kind::Record,
			})
		);
		assert_eq!(nav.frames()[0].path, ".values[0]");
	}

	#[test]
	fn optional_interface_is_pointed_at_any_string() {
		let mut bag = Bag::default();
		let mut nav = Navigator::with_options(ResolveOptions::default(), &mut bag);
		nav.dig_field("extra").expect("extra exists");
		nav.set_string("loose".to_owned()).expect("pointer to interface");
		drop(nav);
		assert_eq!(bag.extra.as_ref().and_then(Dynamic::downcast_ref::<String>).map(String::as_str), Some("loose"));
	}
}
