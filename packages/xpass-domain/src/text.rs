/// Case-insensitive, any-term-any-field text predicate.
///
/// Terms are matched as literal substrings, surrounding whitespace included. An empty filter
/// matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFilter {
	needles: Vec<String>,
}
impl TextFilter {
	pub fn new<I, S>(terms: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut needles: Vec<String> = Vec::new();

		for term in terms {
			let needle = term.as_ref().to_lowercase();

			if needles.contains(&needle) {
				continue;
			}

			needles.push(needle);
		}

		Self { needles }
	}

	pub fn is_empty(&self) -> bool {
		self.needles.is_empty()
	}

	pub fn terms(&self) -> &[String] {
		&self.needles
	}

	pub fn matches_text(&self, field: &str) -> bool {
		if self.needles.is_empty() {
			return true;
		}

		let haystack = field.to_lowercase();

		self.needles.iter().any(|needle| haystack.contains(needle.as_str()))
	}

	pub fn matches_any<'a, I>(&self, fields: I) -> bool
	where
		I: IntoIterator<Item = &'a str>,
	{
		if self.needles.is_empty() {
			return true;
		}

		fields.into_iter().any(|field| self.matches_text(field))
	}

	/// `ILIKE` patterns for each term, wrapped in `%` and escaped with `\`.
	pub fn like_patterns(&self) -> Vec<String> {
		self.needles.iter().map(|needle| format!("%{}%", escape_like(needle))).collect()
	}
}

pub fn escape_like(term: &str) -> String {
	let mut out = String::with_capacity(term.len());

	for ch in term.chars() {
		if matches!(ch, '%' | '_' | '\\') {
			out.push('\\');
		}

		out.push(ch);
	}

	out
}
