use std::{cell::RefCell, num::NonZeroU32};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, TroveService};
use trove_etapi::{Note, SearchParams};
use trove_query::{
	CompileObserver, HierarchySpec, SearchCriteria, SearchQuery, SkipReason, TracingObserver,
};

/// Properties whose matching needs note content, which the fast search mode skips.
const CONTENT_PROPERTIES: [&str; 3] = ["content", "text", "rawContent"];
const ARCHIVED_PROPERTY: &str = "isArchived";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
	#[serde(default)]
	pub text: Option<String>,
	#[serde(default)]
	pub criteria: Vec<SearchCriteria>,
	#[serde(default)]
	pub hierarchy: Option<HierarchySpec>,
	#[serde(default)]
	pub limit: Option<u32>,
	/// Searches archived notes even when no criteria mentions `isArchived`.
	#[serde(default)]
	pub include_archived: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
	pub query: String,
	pub fast_search: bool,
	pub include_archived_notes: bool,
	pub results: Vec<Note>,
	/// Criteria dropped during compilation, one line each.
	pub warnings: Vec<String>,
}

struct CompiledSearch {
	params: SearchParams,
	warnings: Vec<String>,
}

/// Collects dropped criteria as warnings and optionally forwards events to tracing.
struct WarningCollector {
	trace: bool,
	warnings: RefCell<Vec<String>>,
}
impl CompileObserver for WarningCollector {
	fn skipped(&self, index: usize, criteria: &SearchCriteria, reason: &SkipReason) {
		if self.trace {
			TracingObserver.skipped(index, criteria, reason);
		}

		self.warnings
			.borrow_mut()
			.push(format!("criteria[{index}] ({}) was ignored: {reason}.", criteria.property));
	}

	fn compiled(&self, query: &str) {
		if self.trace {
			TracingObserver.compiled(query);
		}
	}
}

impl TroveService {
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let CompiledSearch { params, warnings } = self.compile_search(req)?;
		let results = self.etapi.search_notes(&params).await?;

		tracing::info!(
			results = results.len(),
			fast_search = params.fast_search,
			dropped = warnings.len(),
			"Searched notes."
		);

		Ok(SearchResponse {
			query: params.search,
			fast_search: params.fast_search,
			include_archived_notes: params.include_archived_notes,
			results,
			warnings,
		})
	}

	fn compile_search(&self, req: SearchRequest) -> Result<CompiledSearch> {
		let limit = self.resolve_limit(req.limit)?;
		let include_archived = req.include_archived;
		let query = SearchQuery {
			text: req.text,
			criteria: req.criteria,
			hierarchy: req.hierarchy,
			limit,
		};
		let collector =
			WarningCollector { trace: self.cfg.search.trace_queries, warnings: RefCell::default() };
		let search = trove_query::compile_with(&query, &collector)?;

		if search.is_empty() {
			return Err(Error::InvalidRequest {
				message: "At least one of text, criteria, or hierarchy is required.".to_string(),
			});
		}

		let params = SearchParams {
			search,
			fast_search: use_fast_search(&query),
			include_archived_notes: include_archived || mentions_archived(&query),
		};

		Ok(CompiledSearch { params, warnings: collector.warnings.into_inner() })
	}

	fn resolve_limit(&self, limit: Option<u32>) -> Result<Option<NonZeroU32>> {
		let Some(limit) = limit else { return Ok(None) };
		let max_limit = self.cfg.search.max_limit;

		match NonZeroU32::new(limit) {
			Some(limit) if limit.get() <= max_limit => Ok(Some(limit)),
			_ => Err(Error::InvalidRequest {
				message: format!("limit must be between 1 and {max_limit}, got {limit}."),
			}),
		}
	}
}

fn use_fast_search(query: &SearchQuery) -> bool {
	!query.has_fulltext()
		&& !query
			.criteria
			.iter()
			.filter_map(SearchCriteria::property_key)
			.any(|key| CONTENT_PROPERTIES.contains(&key))
}

fn mentions_archived(query: &SearchQuery) -> bool {
	query
		.criteria
		.iter()
		.filter_map(SearchCriteria::property_key)
		.any(|key| key == ARCHIVED_PROPERTY)
}
