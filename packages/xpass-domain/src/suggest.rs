use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SuggestionKind {
	UserName,
	Category,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
	pub label: String,
	#[serde(rename = "type")]
	pub kind: SuggestionKind,
}

/// Blends profile-name and category suggestions into at most `max` entries.
///
/// Profile names come first. When at least one category exists the names give up one slot so
/// the categories stay visible.
pub fn blend_suggestions(names: Vec<String>, categories: Vec<String>, max: usize) -> Vec<Suggestion> {
	let name_cap = if categories.is_empty() { max } else { max.saturating_sub(1) };
	let mut out: Vec<Suggestion> = names
		.into_iter()
		.take(name_cap)
		.map(|label| Suggestion { label, kind: SuggestionKind::UserName })
		.collect();

	out.extend(
		categories.into_iter().map(|label| Suggestion { label, kind: SuggestionKind::Category }),
	);
	out.truncate(max);

	out
}
