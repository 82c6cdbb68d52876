//! Materialized per-user feeds: full rebuild and windowed reads.
//!
//! Feed rows are a cache derived from interests minus dislikes. Bookmark and feedback exclusions
//! are applied when reading, never when materializing.

use sqlx::{Executor, PgConnection, Postgres, QueryBuilder};

use crate::{
	Error, Result,
	models::{ExpertBookmarkFragment, ExpertFeedFragment, FeedFragment, RecordBookmarkFragment},
	users,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RebuildCounts {
	pub records: u64,
	pub experts: u64,
}

/// Which cached records a record window may return.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordExclusion {
	/// The record feed: everything not bookmarked.
	Bookmarked,
	/// The feedback feed: everything the user has not rated yet.
	Rated,
}

/// One page of a materialized feed, optionally narrowed to search-index matches.
#[derive(Clone, Copy, Debug)]
pub struct Window<'a> {
	pub user_id: i64,
	pub phrase: Option<&'a str>,
	pub offset: i64,
	pub limit: i64,
}

/// Deletes both feeds of `user_id` and reinserts them from current interests and dislikes.
///
/// Must run inside the transaction of the mutation that triggered it. Waits for any other feed
/// writer of the same user to finish, so each statement below sees its committed outcome.
pub async fn rebuild_feeds(conn: &mut PgConnection, user_id: i64) -> Result<RebuildCounts> {
	users::lock_user(conn, user_id).await?;

	sqlx::query("DELETE FROM record_feed WHERE user_id = $1")
		.bind(user_id)
		.execute(&mut *conn)
		.await?;
	sqlx::query("DELETE FROM expert_feed WHERE user_id = $1")
		.bind(user_id)
		.execute(&mut *conn)
		.await?;

	let records = sqlx::query(
		"\
INSERT INTO record_feed (user_id, seq, record_id)
SELECT $1::bigint, ROW_NUMBER() OVER (ORDER BY r.year DESC, r.record_id), r.record_id
FROM records r
WHERE EXISTS (
	SELECT 1
	FROM record_subjects rs
	JOIN interests i ON i.subject_id = rs.subject_id
	WHERE rs.record_id = r.record_id AND i.user_id = $1
)
	AND NOT EXISTS (
		SELECT 1
		FROM record_dislikes d
		WHERE d.user_id = $1 AND d.record_id = r.record_id
	)",
	)
	.bind(user_id)
	.execute(&mut *conn)
	.await?
	.rows_affected();
	let experts = sqlx::query(
		"\
INSERT INTO expert_feed (user_id, seq, expert_id)
SELECT $1::bigint, ROW_NUMBER() OVER (ORDER BY weighted.weight DESC, weighted.expert_id), weighted.expert_id
FROM (
	SELECT es.expert_id, SUM(es.record_count) AS weight
	FROM expert_subjects es
	JOIN interests i ON i.subject_id = es.subject_id
	WHERE i.user_id = $1
	GROUP BY es.expert_id
) AS weighted",
	)
	.bind(user_id)
	.execute(&mut *conn)
	.await?
	.rows_affected();

	Ok(RebuildCounts { records, experts })
}

pub async fn read_record_window<'e, E>(
	executor: E,
	exclusion: RecordExclusion,
	window: Window<'_>,
) -> Result<Vec<FeedFragment>>
where
	E: Executor<'e, Database = Postgres>,
{
	check_window(window)?;

	let mut builder = QueryBuilder::<Postgres>::new(
		"\
SELECT f.record_id AS item_id, r.preview_fragment AS fragment, (v.record_id IS NOT NULL) AS visited
FROM record_feed f
JOIN records r ON r.record_id = f.record_id
LEFT JOIN record_visits v ON v.user_id = f.user_id AND v.record_id = f.record_id
WHERE f.user_id = ",
	);

	builder.push_bind(window.user_id);

	match exclusion {
		RecordExclusion::Bookmarked => builder.push(
			" AND NOT EXISTS (SELECT 1 FROM record_bookmarks b WHERE b.user_id = f.user_id AND b.record_id = f.record_id)",
		),
		RecordExclusion::Rated => builder.push(
			" AND NOT EXISTS (SELECT 1 FROM feedback fb WHERE fb.user_id = f.user_id AND fb.record_id = f.record_id)",
		),
	};

	if let Some(phrase) = window.phrase {
		builder.push(
			" AND EXISTS (SELECT 1 FROM record_search s WHERE s.record_id = f.record_id AND s.document @@ websearch_to_tsquery('simple', ",
		);
		builder.push_bind(phrase);
		builder.push("))");
	}

	push_page(&mut builder, window);

	let rows = builder.build_query_as().fetch_all(executor).await?;

	Ok(rows)
}

pub async fn read_expert_window<'e, E>(
	executor: E,
	window: Window<'_>,
) -> Result<Vec<ExpertFeedFragment>>
where
	E: Executor<'e, Database = Postgres>,
{
	check_window(window)?;

	let mut builder = QueryBuilder::<Postgres>::new(
		"\
SELECT f.expert_id AS item_id, e.preview_fragment AS fragment
FROM expert_feed f
JOIN experts e ON e.expert_id = f.expert_id
WHERE f.user_id = ",
	);

	builder.push_bind(window.user_id);
	builder.push(
		" AND NOT EXISTS (SELECT 1 FROM expert_bookmarks b WHERE b.user_id = f.user_id AND b.expert_id = f.expert_id)",
	);

	if let Some(phrase) = window.phrase {
		builder.push(
			" AND EXISTS (SELECT 1 FROM expert_search s WHERE s.expert_id = f.expert_id AND s.document @@ websearch_to_tsquery('simple', ",
		);
		builder.push_bind(phrase);
		builder.push("))");
	}

	push_page(&mut builder, window);

	let rows = builder.build_query_as().fetch_all(executor).await?;

	Ok(rows)
}

/// Cached records not currently bookmarked.
pub async fn count_record_feed<'e, E>(executor: E, user_id: i64) -> Result<i64>
where
	E: Executor<'e, Database = Postgres>,
{
	let count: i64 = sqlx::query_scalar(
		"\
SELECT COUNT(*)
FROM record_feed f
WHERE f.user_id = $1
	AND NOT EXISTS (
		SELECT 1
		FROM record_bookmarks b
		WHERE b.user_id = f.user_id AND b.record_id = f.record_id
	)",
	)
	.bind(user_id)
	.fetch_one(executor)
	.await?;

	Ok(count)
}

/// Newest bookmark first, collection ids ascending.
pub async fn read_record_bookmarks<'e, E>(
	executor: E,
	user_id: i64,
) -> Result<Vec<RecordBookmarkFragment>>
where
	E: Executor<'e, Database = Postgres>,
{
	let rows = sqlx::query_as::<_, RecordBookmarkFragment>(
		"\
SELECT
	b.record_id,
	r.preview_fragment AS fragment,
	(v.record_id IS NOT NULL) AS visited,
	ARRAY(
		SELECT c.collection_id
		FROM record_bookmark_collections c
		WHERE c.user_id = b.user_id AND c.record_id = b.record_id
		ORDER BY c.collection_id
	) AS collection_ids
FROM record_bookmarks b
JOIN records r ON r.record_id = b.record_id
LEFT JOIN record_visits v ON v.user_id = b.user_id AND v.record_id = b.record_id
WHERE b.user_id = $1
ORDER BY b.bookmark_seq DESC",
	)
	.bind(user_id)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

pub async fn read_expert_bookmarks<'e, E>(
	executor: E,
	user_id: i64,
) -> Result<Vec<ExpertBookmarkFragment>>
where
	E: Executor<'e, Database = Postgres>,
{
	let rows = sqlx::query_as::<_, ExpertBookmarkFragment>(
		"\
SELECT b.expert_id, e.preview_fragment AS fragment
FROM expert_bookmarks b
JOIN experts e ON e.expert_id = b.expert_id
WHERE b.user_id = $1
ORDER BY b.bookmark_seq DESC",
	)
	.bind(user_id)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

fn check_window(window: Window<'_>) -> Result<()> {
	if window.offset < 0 || window.limit < 0 {
		return Err(Error::InvalidArgument(format!(
			"Window offset and limit must be non-negative, got offset {} and limit {}.",
			window.offset, window.limit
		)));
	}

	Ok(())
}

fn push_page(builder: &mut QueryBuilder<'_, Postgres>, window: Window<'_>) {
	builder.push(" ORDER BY f.seq LIMIT ");
	builder.push_bind(window.limit);
	builder.push(" OFFSET ");
	builder.push_bind(window.offset);
}
