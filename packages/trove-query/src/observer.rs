use std::fmt::{Display, Formatter};

use crate::SearchCriteria;

/// Why a criteria item compiled to nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
	EmptyProperty,
	MissingValue,
	UnknownOperator(String),
	/// An operator that exists in the vocabulary but has no meaning for the criteria kind.
	UnsupportedOperator(String),
	UnknownProperty(String),
	InvalidBoolean(String),
	InvalidNumber(String),
}
impl Display for SkipReason {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::EmptyProperty => write!(f, "property is empty"),
			Self::MissingValue => write!(f, "operator requires a value"),
			Self::UnknownOperator(op) => write!(f, "unknown operator '{op}'"),
			Self::UnsupportedOperator(op) =>
				write!(f, "operator '{op}' is not supported for note properties"),
			Self::UnknownProperty(property) => write!(f, "unknown note property '{property}'"),
			Self::InvalidBoolean(value) => write!(f, "expected true or false, got '{value}'"),
			Self::InvalidNumber(value) => write!(f, "expected a number, got '{value}'"),
		}
	}
}

/// Receives compilation events. Every method defaults to doing nothing.
pub trait CompileObserver {
	fn skipped(&self, _index: usize, _criteria: &SearchCriteria, _reason: &SkipReason) {}

	fn compiled(&self, _query: &str) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;
impl CompileObserver for NoopObserver {}

#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;
impl CompileObserver for TracingObserver {
	fn skipped(&self, index: usize, criteria: &SearchCriteria, reason: &SkipReason) {
		tracing::debug!(index, property = %criteria.property, %reason, "Dropped search criteria.");
	}

	fn compiled(&self, query: &str) {
		tracing::debug!(query, "Compiled search query.");
	}
}
