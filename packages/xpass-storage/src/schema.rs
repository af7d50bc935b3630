pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_categories.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_categories.sql")),
				"tables/002_addresses.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_addresses.sql")),
				"tables/003_cards.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_cards.sql")),
				"tables/004_card_categories.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_card_categories.sql")),
				"tables/005_profiles.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_profiles.sql")),
				"tables/006_follow_edges.sql" =>
					out.push_str(include_str!("../../../sql/tables/006_follow_edges.sql")),
				"tables/007_card_accesses.sql" =>
					out.push_str(include_str!("../../../sql/tables/007_card_accesses.sql")),
				other => {
					out.push_str("-- missing include: ");
					out.push_str(other);
				},
			}

			out.push('\n');

			continue;
		}

		out.push_str(line);
		out.push('\n');
	}

	out
}

#[cfg(test)]
mod tests {
	#[test]
	fn includes_are_expanded() {
		let sql = super::render_schema();

		assert!(!sql.contains("\\ir "));
		assert!(!sql.contains("missing include"));
		assert!(sql.contains("CREATE TABLE IF NOT EXISTS card_accesses"));
		assert!(sql.contains("CREATE TABLE IF NOT EXISTS follow_edges"));
	}
}
