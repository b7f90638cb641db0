use std::num::NonZeroU32;

/// Always-true condition that gives a purely structured query the leading body the grammar needs.
pub const BASE_PREDICATE: &str = "note.noteId != ''";

/// Joins the final query. An empty result means no criteria were supplied.
pub fn assemble(
	fulltext: Option<&str>,
	groups: &[String],
	hierarchy: Option<&str>,
	limit: Option<NonZeroU32>,
) -> String {
	let fulltext = fulltext.filter(|text| !text.trim().is_empty());
	let structured = groups
		.iter()
		.map(String::as_str)
		.chain(hierarchy)
		.filter(|expr| !expr.is_empty())
		.collect::<Vec<_>>();

	if fulltext.is_none() && structured.is_empty() {
		return String::new();
	}

	let lead = fulltext.unwrap_or(BASE_PREDICATE);
	let body = std::iter::once(lead).chain(structured).collect::<Vec<_>>().join(" ");

	match limit {
		Some(limit) => format!("{body} limit {limit}"),
		None => body,
	}
}
