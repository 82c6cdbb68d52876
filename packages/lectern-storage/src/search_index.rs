//! Full-text projections over records and experts.
//!
//! Rebuilds are full-table replacements. They are not safe to run next to heavy write traffic;
//! callers schedule them after bulk ingestion.

use sqlx::PgConnection;

use crate::Result;

/// Replaces every record document: title, abstract, subject keywords, creator names.
pub async fn rebuild_record_search(conn: &mut PgConnection) -> Result<u64> {
	sqlx::query("DELETE FROM record_search").execute(&mut *conn).await?;

	let result = sqlx::query(
		"\
INSERT INTO record_search (record_id, document)
SELECT
	r.record_id,
	to_tsvector(
		'simple',
		concat_ws(' ', r.title, r.abstract, subject_text.keywords, creator_text.names)
	)
FROM records r
LEFT JOIN LATERAL (
	SELECT string_agg(s.keyword, ' ' ORDER BY s.keyword) AS keywords
	FROM record_subjects rs
	JOIN subjects s ON s.subject_id = rs.subject_id
	WHERE rs.record_id = r.record_id
) AS subject_text ON TRUE
LEFT JOIN LATERAL (
	SELECT string_agg(rc.first_name || ' ' || rc.last_name, ' ' ORDER BY rc.position) AS names
	FROM record_creators rc
	WHERE rc.record_id = r.record_id
) AS creator_text ON TRUE",
	)
	.execute(&mut *conn)
	.await?;

	Ok(result.rows_affected())
}

/// Replaces every expert document: full name, attributed record titles, subject keywords.
pub async fn rebuild_expert_search(conn: &mut PgConnection) -> Result<u64> {
	sqlx::query("DELETE FROM expert_search").execute(&mut *conn).await?;

	let result = sqlx::query(
		"\
INSERT INTO expert_search (expert_id, document)
SELECT
	e.expert_id,
	to_tsvector(
		'simple',
		concat_ws(' ', e.first_name, e.last_name, title_text.titles, subject_text.keywords)
	)
FROM experts e
LEFT JOIN LATERAL (
	SELECT string_agg(attributed.title, ' ' ORDER BY attributed.record_id) AS titles
	FROM (
		SELECT DISTINCT r.record_id, r.title
		FROM record_creators rc
		JOIN records r ON r.record_id = rc.record_id
		WHERE rc.expert_id = e.expert_id
	) AS attributed
) AS title_text ON TRUE
LEFT JOIN LATERAL (
	SELECT string_agg(s.keyword, ' ' ORDER BY s.keyword) AS keywords
	FROM expert_subjects es
	JOIN subjects s ON s.subject_id = es.subject_id
	WHERE es.expert_id = e.expert_id
) AS subject_text ON TRUE",
	)
	.execute(&mut *conn)
	.await?;

	Ok(result.rows_affected())
}
