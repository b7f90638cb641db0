use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

const NOTE_PREFIX: &str = "note.";

/// Connector between a criteria item and the one that follows it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Logic {
	#[serde(rename = "AND", alias = "and")]
	And,
	#[serde(rename = "OR", alias = "or")]
	Or,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CriteriaKind {
	Label,
	Relation,
	#[serde(alias = "note_property")]
	NoteProperty,
	Fulltext,
}

/// One structured filter condition. Order matters: `logic` links this item to the next one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
	pub property: String,
	#[serde(rename = "type", alias = "variant")]
	pub kind: CriteriaKind,
	#[serde(default, alias = "operator", skip_serializing_if = "Option::is_none")]
	pub op: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub logic: Option<Logic>,
}
impl SearchCriteria {
	pub fn new(property: impl Into<String>, kind: CriteriaKind) -> Self {
		Self { property: property.into(), kind, op: None, value: None, logic: None }
	}

	pub fn label(property: impl Into<String>) -> Self {
		Self::new(property, CriteriaKind::Label)
	}

	pub fn relation(property: impl Into<String>) -> Self {
		Self::new(property, CriteriaKind::Relation)
	}

	pub fn note_property(property: impl Into<String>) -> Self {
		Self::new(property, CriteriaKind::NoteProperty)
	}

	pub fn with_op(mut self, op: impl Into<String>) -> Self {
		self.op = Some(op.into());

		self
	}

	pub fn with_value(mut self, value: impl Into<String>) -> Self {
		self.value = Some(value.into());

		self
	}

	pub fn with_logic(mut self, logic: Logic) -> Self {
		self.logic = Some(logic);

		self
	}

	/// Normalized property key for note-property criteria, `None` for every other kind.
	pub fn property_key(&self) -> Option<&str> {
		match self.kind {
			CriteriaKind::NoteProperty => Some(normalize_property(&self.property)),
			CriteriaKind::Label | CriteriaKind::Relation | CriteriaKind::Fulltext => None,
		}
	}

	/// Free-text token of a fulltext criteria: its value, or its property when no value is given.
	pub fn fulltext_token(&self) -> Option<&str> {
		match self.kind {
			CriteriaKind::Fulltext => self
				.required_value()
				.or(Some(self.property.as_str()))
				.filter(|text| !text.trim().is_empty()),
			CriteriaKind::Label | CriteriaKind::Relation | CriteriaKind::NoteProperty => None,
		}
	}

	pub(crate) fn required_value(&self) -> Option<&str> {
		self.value.as_deref().filter(|value| !value.trim().is_empty())
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HierarchyKind {
	Children,
	Descendants,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchySpec {
	pub kind: HierarchyKind,
	#[serde(alias = "noteId")]
	pub reference_note_id: String,
}

/// Everything one compilation consumes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchQuery {
	pub text: Option<String>,
	pub criteria: Vec<SearchCriteria>,
	pub hierarchy: Option<HierarchySpec>,
	pub limit: Option<NonZeroU32>,
}
impl SearchQuery {
	/// Whether the compiled query will lead with free text rather than the base predicate.
	pub fn has_fulltext(&self) -> bool {
		self.text.as_deref().is_some_and(|text| !text.trim().is_empty())
			|| self.criteria.iter().any(|criteria| criteria.fulltext_token().is_some())
	}
}

pub(crate) fn normalize_property(raw: &str) -> &str {
	let trimmed = raw.trim();

	trimmed.strip_prefix(NOTE_PREFIX).unwrap_or(trimmed)
}
