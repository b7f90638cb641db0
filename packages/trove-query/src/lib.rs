//! Compiles structured note-search criteria into Trilium search-grammar text.
//!
//! Compilation is pure: the same input always yields the same string. Malformed criteria are
//! dropped and reported to the [`CompileObserver`]; only invalid dates abort with an [`Error`].

pub mod assemble;
pub mod date;
pub mod group;

mod criteria;
mod error;
mod fragment;
mod observer;

pub use criteria::{CriteriaKind, HierarchyKind, HierarchySpec, Logic, SearchCriteria, SearchQuery};
pub use error::{Error, Result};
pub use observer::{CompileObserver, NoopObserver, SkipReason, TracingObserver};

use crate::{fragment::Fragment, group::GroupItem};

pub fn compile(query: &SearchQuery) -> Result<String> {
	compile_with(query, &NoopObserver)
}

pub fn compile_with(query: &SearchQuery, observer: &dyn CompileObserver) -> Result<String> {
	let mut fulltext = query.text.as_deref().into_iter().collect::<Vec<_>>();
	let mut fragments = Vec::with_capacity(query.criteria.len());

	for (index, criteria) in query.criteria.iter().enumerate() {
		match fragment::build(criteria)? {
			Fragment::Token(token) => fragments.push((token, criteria.logic)),
			Fragment::Fulltext(text) => fulltext.push(text),
			Fragment::Skipped(reason) => {
				observer.skipped(index, criteria, &reason);
				fragments.push((String::new(), criteria.logic));
			},
		}
	}

	let items = fragments
		.iter()
		.map(|(fragment, logic)| GroupItem { fragment: fragment.as_str(), logic: *logic })
		.collect::<Vec<_>>();
	let groups = group::group(&items);
	let hierarchy = query.hierarchy.as_ref().and_then(fragment::hierarchy);
	let fulltext =
		fulltext.into_iter().filter(|text| !text.trim().is_empty()).collect::<Vec<_>>().join(" ");
	let compiled =
		assemble::assemble(Some(fulltext.as_str()), &groups, hierarchy.as_deref(), query.limit);

	observer.compiled(&compiled);

	Ok(compiled)
}
