/// Renders the bootstrap schema with every `\ir` include inlined.
pub fn render_schema() -> String {
	let init = include_str!("../../../sql/init.sql");

	expand_includes(init)
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_users.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_users.sql")),
				"tables/002_subjects.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_subjects.sql")),
				"tables/003_record_types.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_record_types.sql")),
				"tables/004_records.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_records.sql")),
				"tables/005_experts.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_experts.sql")),
				"tables/006_record_creators.sql" =>
					out.push_str(include_str!("../../../sql/tables/006_record_creators.sql")),
				"tables/007_record_subjects.sql" =>
					out.push_str(include_str!("../../../sql/tables/007_record_subjects.sql")),
				"tables/008_expert_subjects.sql" =>
					out.push_str(include_str!("../../../sql/tables/008_expert_subjects.sql")),
				"tables/009_interests.sql" =>
					out.push_str(include_str!("../../../sql/tables/009_interests.sql")),
				"tables/010_record_dislikes.sql" =>
					out.push_str(include_str!("../../../sql/tables/010_record_dislikes.sql")),
				"tables/011_record_feed.sql" =>
					out.push_str(include_str!("../../../sql/tables/011_record_feed.sql")),
				"tables/012_expert_feed.sql" =>
					out.push_str(include_str!("../../../sql/tables/012_expert_feed.sql")),
				"tables/013_collections.sql" =>
					out.push_str(include_str!("../../../sql/tables/013_collections.sql")),
				"tables/014_record_bookmarks.sql" =>
					out.push_str(include_str!("../../../sql/tables/014_record_bookmarks.sql")),
				"tables/015_record_bookmark_collections.sql" => out.push_str(include_str!(
					"../../../sql/tables/015_record_bookmark_collections.sql"
				)),
				"tables/016_expert_bookmarks.sql" =>
					out.push_str(include_str!("../../../sql/tables/016_expert_bookmarks.sql")),
				"tables/017_record_visits.sql" =>
					out.push_str(include_str!("../../../sql/tables/017_record_visits.sql")),
				"tables/018_feedback.sql" =>
					out.push_str(include_str!("../../../sql/tables/018_feedback.sql")),
				"tables/019_record_search.sql" =>
					out.push_str(include_str!("../../../sql/tables/019_record_search.sql")),
				"tables/020_expert_search.sql" =>
					out.push_str(include_str!("../../../sql/tables/020_expert_search.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
