use crate::{
	CriteriaKind, HierarchyKind, HierarchySpec, Result, SearchCriteria, SkipReason,
	criteria::normalize_property, date,
};

const LABEL_SIGIL: char = '#';
const RELATION_SIGIL: char = '~';
const RELATION_DEFAULT_PATH: &str = ".title";

/// Outcome of compiling one criteria item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Fragment<'a> {
	Token(String),
	/// Free text travels outside the grouping and leads the assembled query.
	Fulltext(&'a str),
	Skipped(SkipReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Operator {
	Exists,
	NotExists,
	Eq,
	NotEq,
	Gte,
	Lte,
	Gt,
	Lt,
	Contains,
	StartsWith,
	EndsWith,
	Regex,
}
impl Operator {
	fn parse(raw: Option<&str>, kind: CriteriaKind) -> Option<Self> {
		let Some(raw) = raw else { return Some(Self::Exists) };

		match raw.trim().to_ascii_lowercase().as_str() {
			"exists" => Some(Self::Exists),
			"not_exists" => Some(Self::NotExists),
			"=" => Some(Self::Eq),
			"!=" => Some(Self::NotEq),
			"not_equal" if kind == CriteriaKind::NoteProperty => Some(Self::NotEq),
			">=" => Some(Self::Gte),
			"<=" => Some(Self::Lte),
			">" => Some(Self::Gt),
			"<" => Some(Self::Lt),
			"contains" => Some(Self::Contains),
			"starts_with" => Some(Self::StartsWith),
			"ends_with" => Some(Self::EndsWith),
			"regex" => Some(Self::Regex),
			_ => None,
		}
	}

	/// Grammar token for value comparisons, `None` for existence checks.
	fn comparison(self) -> Option<&'static str> {
		match self {
			Self::Exists | Self::NotExists => None,
			Self::Eq => Some("="),
			Self::NotEq => Some("!="),
			Self::Gte => Some(">="),
			Self::Lte => Some("<="),
			Self::Gt => Some(">"),
			Self::Lt => Some("<"),
			Self::Contains => Some("*=*"),
			Self::StartsWith => Some("=*"),
			Self::EndsWith => Some("*="),
			Self::Regex => Some("%="),
		}
	}

	fn as_str(self) -> &'static str {
		match self {
			Self::Exists => "exists",
			Self::NotExists => "not_exists",
			other => other.comparison().unwrap_or_default(),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PropertyClass {
	Boolean,
	Numeric,
	Date,
	Text,
}
impl PropertyClass {
	fn of(key: &str) -> Option<Self> {
		match key {
			"isArchived" | "isProtected" => Some(Self::Boolean),
			"labelCount"
			| "ownedLabelCount"
			| "relationCount"
			| "ownedRelationCount"
			| "relationCountIncludingLinks"
			| "attributeCount"
			| "ownedAttributeCount"
			| "targetRelationCount"
			| "targetRelationCountIncludingLinks"
			| "parentCount"
			| "childrenCount"
			| "contentSize"
			| "noteSize"
			| "revisionCount" => Some(Self::Numeric),
			"dateCreated" | "dateModified" | "utcDateCreated" | "utcDateModified" =>
				Some(Self::Date),
			"noteId" | "title" | "type" | "mime" | "content" | "text" | "rawContent"
			| "parents.title" | "parents.noteId" | "children.title" | "children.noteId"
			| "ancestors.title" | "ancestors.noteId" => Some(Self::Text),
			_ => None,
		}
	}
}

pub(crate) fn build(criteria: &SearchCriteria) -> Result<Fragment<'_>> {
	match criteria.kind {
		CriteriaKind::Label => Ok(attribute(criteria, LABEL_SIGIL)),
		CriteriaKind::Relation => Ok(attribute(criteria, RELATION_SIGIL)),
		CriteriaKind::NoteProperty => note_property(criteria),
		CriteriaKind::Fulltext => Ok(fulltext(criteria)),
	}
}

pub(crate) fn hierarchy(scope: &HierarchySpec) -> Option<String> {
	let reference = scope.reference_note_id.trim();

	if reference.is_empty() {
		return None;
	}

	let path = match scope.kind {
		HierarchyKind::Children => "note.parents.noteId",
		HierarchyKind::Descendants => "note.ancestors.noteId",
	};

	Some(format!("{path} = {}", quote(reference)))
}

fn attribute(criteria: &SearchCriteria, sigil: char) -> Fragment<'_> {
	let name = criteria.property.trim();

	if name.is_empty() {
		return Fragment::Skipped(SkipReason::EmptyProperty);
	}

	let Some(op) = Operator::parse(criteria.op.as_deref(), criteria.kind) else {
		return Fragment::Skipped(unknown_operator(criteria));
	};
	let Some(token) = op.comparison() else {
		return match op {
			Operator::NotExists => Fragment::Token(format!("{sigil}!{name}")),
			_ => Fragment::Token(format!("{sigil}{name}")),
		};
	};
	let Some(value) = criteria.required_value() else {
		return Fragment::Skipped(SkipReason::MissingValue);
	};
	// Relations compare through a property of the target note, never directly.
	let path =
		if sigil == RELATION_SIGIL && !name.contains('.') { RELATION_DEFAULT_PATH } else { "" };

	Fragment::Token(format!("{sigil}{name}{path} {token} {}", quote(value)))
}

fn note_property(criteria: &SearchCriteria) -> Result<Fragment<'_>> {
	let key = normalize_property(&criteria.property);

	if key.is_empty() {
		return Ok(Fragment::Skipped(SkipReason::EmptyProperty));
	}

	let Some(class) = PropertyClass::of(key) else {
		return Ok(Fragment::Skipped(SkipReason::UnknownProperty(key.to_string())));
	};
	let Some(op) = Operator::parse(criteria.op.as_deref(), criteria.kind) else {
		return Ok(Fragment::Skipped(unknown_operator(criteria)));
	};
	let Some(token) = op.comparison() else {
		return Ok(Fragment::Skipped(SkipReason::UnsupportedOperator(op.as_str().to_string())));
	};
	let Some(value) = criteria.required_value() else {
		return Ok(Fragment::Skipped(SkipReason::MissingValue));
	};
	let rendered = match class {
		PropertyClass::Boolean => match value {
			"true" | "false" => value.to_string(),
			_ => return Ok(Fragment::Skipped(SkipReason::InvalidBoolean(value.to_string()))),
		},
		PropertyClass::Numeric => {
			let number = value.trim();

			if !number.parse::<f64>().is_ok_and(f64::is_finite) {
				return Ok(Fragment::Skipped(SkipReason::InvalidNumber(value.to_string())));
			}

			number.to_string()
		},
		PropertyClass::Date => quote(date::validate_iso_date(value, key)?),
		PropertyClass::Text => quote(value),
	};

	Ok(Fragment::Token(format!("note.{key} {token} {rendered}")))
}

fn fulltext(criteria: &SearchCriteria) -> Fragment<'_> {
	match criteria.fulltext_token() {
		Some(text) => Fragment::Fulltext(text),
		None => Fragment::Skipped(SkipReason::MissingValue),
	}
}

fn unknown_operator(criteria: &SearchCriteria) -> SkipReason {
	SkipReason::UnknownOperator(criteria.op.as_deref().unwrap_or_default().to_string())
}

fn quote(value: &str) -> String {
	format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

#[cfg(test)]
mod tests {
	use crate::{
		Error, HierarchyKind, HierarchySpec, SearchCriteria, SkipReason,
		fragment::{Fragment, build, hierarchy},
	};

	fn token(criteria: &SearchCriteria) -> String {
		match build(criteria).expect("fragment") {
			Fragment::Token(token) => token,
			other => panic!("expected token, got {other:?}"),
		}
	}

	fn skipped(criteria: &SearchCriteria) -> SkipReason {
		match build(criteria).expect("fragment") {
			Fragment::Skipped(reason) => reason,
			other => panic!("expected skip, got {other:?}"),
		}
	}

	#[test]
	fn label_existence_defaults_when_operator_is_absent() {
		assert_eq!(token(&SearchCriteria::label("book")), "#book");
		assert_eq!(token(&SearchCriteria::label("book").with_op("not_exists")), "#!book");
		assert_eq!(token(&SearchCriteria::relation("author").with_op("exists")), "~author");
		assert_eq!(token(&SearchCriteria::relation("author").with_op("not_exists")), "~!author");
	}

	#[test]
	fn label_operators_map_to_grammar_tokens() {
		let cases = [
			("=", "#genre = 'fantasy'"),
			("!=", "#genre != 'fantasy'"),
			(">=", "#genre >= 'fantasy'"),
			("<", "#genre < 'fantasy'"),
			("contains", "#genre *=* 'fantasy'"),
			("starts_with", "#genre =* 'fantasy'"),
			("ends_with", "#genre *= 'fantasy'"),
			("regex", "#genre %= 'fantasy'"),
		];

		for (op, expected) in cases {
			assert_eq!(
				token(&SearchCriteria::label("genre").with_op(op).with_value("fantasy")),
				expected
			);
		}
	}

	#[test]
	fn escapes_single_quotes_in_values() {
		assert_eq!(
			token(&SearchCriteria::label("quote").with_op("=").with_value("it's")),
			r"#quote = 'it\'s'"
		);
	}

	#[test]
	fn escapes_backslashes_before_quotes() {
		assert_eq!(
			token(&SearchCriteria::label("path").with_op("=").with_value(r"C:\")),
			r"#path = 'C:\\'"
		);
		assert_eq!(
			token(&SearchCriteria::label("path").with_op("=").with_value(r"a\'b")),
			r"#path = 'a\\\'b'"
		);
	}

	#[test]
	fn relation_comparison_adds_title_path() {
		assert_eq!(
			token(&SearchCriteria::relation("author").with_op("contains").with_value("Tolkien")),
			"~author.title *=* 'Tolkien'"
		);
		assert_eq!(
			token(&SearchCriteria::relation("author.noteId").with_op("=").with_value("abc")),
			"~author.noteId = 'abc'"
		);
	}

	#[test]
	fn attribute_builder_drops_not_equal_alias_and_missing_values() {
		assert_eq!(
			skipped(&SearchCriteria::label("genre").with_op("not_equal").with_value("x")),
			SkipReason::UnknownOperator("not_equal".to_string())
		);
		assert_eq!(skipped(&SearchCriteria::label("genre").with_op("=")), SkipReason::MissingValue);
		assert_eq!(
			skipped(&SearchCriteria::label("genre").with_op("=").with_value("")),
			SkipReason::MissingValue
		);
		assert_eq!(skipped(&SearchCriteria::label("  ")), SkipReason::EmptyProperty);
	}

	#[test]
	fn note_property_formats_by_class() {
		assert_eq!(
			token(&SearchCriteria::note_property("labelCount").with_op(">").with_value("5")),
			"note.labelCount > 5"
		);
		assert_eq!(
			token(&SearchCriteria::note_property("isArchived").with_op("=").with_value("true")),
			"note.isArchived = true"
		);
		assert_eq!(
			token(&SearchCriteria::note_property("title").with_op("not_equal").with_value("Bob's")),
			r"note.title != 'Bob\'s'"
		);
		assert_eq!(
			token(&SearchCriteria::note_property("dateCreated").with_op(">=").with_value("2024-01-01")),
			"note.dateCreated >= '2024-01-01'"
		);
		assert_eq!(
			token(&SearchCriteria::note_property("note.parents.title").with_op("=").with_value("Books")),
			"note.parents.title = 'Books'"
		);
	}

	#[test]
	fn note_property_drops_malformed_items() {
		assert_eq!(
			skipped(&SearchCriteria::note_property("isArchived").with_op("=").with_value("yes")),
			SkipReason::InvalidBoolean("yes".to_string())
		);
		assert_eq!(
			skipped(&SearchCriteria::note_property("labelCount").with_op(">").with_value("many")),
			SkipReason::InvalidNumber("many".to_string())
		);
		assert_eq!(
			skipped(&SearchCriteria::note_property("colour").with_op("=").with_value("red")),
			SkipReason::UnknownProperty("colour".to_string())
		);
		assert_eq!(
			skipped(&SearchCriteria::note_property("title").with_op("like").with_value("x")),
			SkipReason::UnknownOperator("like".to_string())
		);
		assert_eq!(
			skipped(&SearchCriteria::note_property("title")),
			SkipReason::UnsupportedOperator("exists".to_string())
		);
	}

	#[test]
	fn note_property_rejects_relative_dates() {
		let criteria =
			SearchCriteria::note_property("dateCreated").with_op(">=").with_value("TODAY-7");
		let err = build(&criteria).expect_err("expected validation error");

		assert!(matches!(err, Error::InvalidDateFormat { ref property, .. } if property == "dateCreated"));
	}

	#[test]
	fn date_without_value_is_dropped_before_validation() {
		assert_eq!(
			skipped(&SearchCriteria::note_property("dateModified").with_op("<")),
			SkipReason::MissingValue
		);
	}

	#[test]
	fn hierarchy_targets_parents_or_ancestors() {
		let children =
			HierarchySpec { kind: HierarchyKind::Children, reference_note_id: "root".to_string() };
		let descendants =
			HierarchySpec { kind: HierarchyKind::Descendants, reference_note_id: "a'b".to_string() };
		let empty = HierarchySpec { kind: HierarchyKind::Children, reference_note_id: " ".to_string() };

		assert_eq!(hierarchy(&children).as_deref(), Some("note.parents.noteId = 'root'"));
		assert_eq!(hierarchy(&descendants).as_deref(), Some(r"note.ancestors.noteId = 'a\'b'"));
		assert_eq!(hierarchy(&empty), None);
	}

	#[test]
	fn fulltext_prefers_value_over_property() {
		let criteria = SearchCriteria::new("ignored", crate::CriteriaKind::Fulltext).with_value("towers");

		assert_eq!(build(&criteria).expect("fragment"), Fragment::Fulltext("towers"));
		assert_eq!(
			build(&SearchCriteria::new("hobbit", crate::CriteriaKind::Fulltext)).expect("fragment"),
			Fragment::Fulltext("hobbit")
		);
	}
}
