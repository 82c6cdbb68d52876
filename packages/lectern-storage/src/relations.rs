//! Relationship Store: per-user interests, dislikes, bookmarks, collections, visits, and feedback.

use sqlx::{Executor, PgConnection, Postgres};

use crate::{
	Result,
	models::{Collection, Feedback, Subject},
	users,
};

pub async fn insert_interest(conn: &mut PgConnection, user_id: i64, subject_id: i64) -> Result<bool> {
	let result = sqlx::query(
		"\
INSERT INTO interests (user_id, subject_id)
VALUES ($1, $2)
ON CONFLICT DO NOTHING",
	)
	.bind(user_id)
	.bind(subject_id)
	.execute(&mut *conn)
	.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn delete_interest(conn: &mut PgConnection, user_id: i64, subject_id: i64) -> Result<bool> {
	let result = sqlx::query("DELETE FROM interests WHERE user_id = $1 AND subject_id = $2")
		.bind(user_id)
		.bind(subject_id)
		.execute(&mut *conn)
		.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn list_interests<'e, E>(executor: E, user_id: i64) -> Result<Vec<Subject>>
where
	E: Executor<'e, Database = Postgres>,
{
	let rows = sqlx::query_as::<_, Subject>(
		"\
SELECT s.subject_id, s.keyword
FROM interests i
JOIN subjects s ON s.subject_id = i.subject_id
WHERE i.user_id = $1
ORDER BY s.keyword",
	)
	.bind(user_id)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

/// Users holding at least one interest, in id order.
pub async fn list_users_with_interests<'e, E>(executor: E) -> Result<Vec<i64>>
where
	E: Executor<'e, Database = Postgres>,
{
	let rows: Vec<i64> =
		sqlx::query_scalar("SELECT DISTINCT user_id FROM interests ORDER BY user_id")
			.fetch_all(executor)
			.await?;

	Ok(rows)
}

/// Inserts the dislike marker and drops the record from the cached record feed.
///
/// Bookmarks, feedback, and the search projection are left untouched.
pub async fn insert_record_dislike(
	conn: &mut PgConnection,
	user_id: i64,
	record_id: i64,
) -> Result<bool> {
	users::lock_user(conn, user_id).await?;

	let result = sqlx::query(
		"\
INSERT INTO record_dislikes (user_id, record_id)
VALUES ($1, $2)
ON CONFLICT DO NOTHING",
	)
	.bind(user_id)
	.bind(record_id)
	.execute(&mut *conn)
	.await?;

	sqlx::query("DELETE FROM record_feed WHERE user_id = $1 AND record_id = $2")
		.bind(user_id)
		.bind(record_id)
		.execute(&mut *conn)
		.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn insert_record_bookmark<'e, E>(executor: E, user_id: i64, record_id: i64) -> Result<bool>
where
	E: Executor<'e, Database = Postgres>,
{
	let result = sqlx::query(
		"\
INSERT INTO record_bookmarks (user_id, record_id)
VALUES ($1, $2)
ON CONFLICT DO NOTHING",
	)
	.bind(user_id)
	.bind(record_id)
	.execute(executor)
	.await?;

	Ok(result.rows_affected() > 0)
}

/// Collection links of the bookmark go with it.
pub async fn delete_record_bookmark<'e, E>(executor: E, user_id: i64, record_id: i64) -> Result<bool>
where
	E: Executor<'e, Database = Postgres>,
{
	let result = sqlx::query("DELETE FROM record_bookmarks WHERE user_id = $1 AND record_id = $2")
		.bind(user_id)
		.bind(record_id)
		.execute(executor)
		.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn insert_expert_bookmark<'e, E>(executor: E, user_id: i64, expert_id: i64) -> Result<bool>
where
	E: Executor<'e, Database = Postgres>,
{
	let result = sqlx::query(
		"\
INSERT INTO expert_bookmarks (user_id, expert_id)
VALUES ($1, $2)
ON CONFLICT DO NOTHING",
	)
	.bind(user_id)
	.bind(expert_id)
	.execute(executor)
	.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn delete_expert_bookmark<'e, E>(executor: E, user_id: i64, expert_id: i64) -> Result<bool>
where
	E: Executor<'e, Database = Postgres>,
{
	let result = sqlx::query("DELETE FROM expert_bookmarks WHERE user_id = $1 AND expert_id = $2")
		.bind(user_id)
		.bind(expert_id)
		.execute(executor)
		.await?;

	Ok(result.rows_affected() > 0)
}

/// Returns the subset of `collection_ids` owned by `user_id`, share-locked until commit so a
/// concurrent collection delete waits for the caller.
pub async fn owned_collection_ids(
	conn: &mut PgConnection,
	user_id: i64,
	collection_ids: &[i64],
) -> Result<Vec<i64>> {
	if collection_ids.is_empty() {
		return Ok(vec![]);
	}

	let rows: Vec<i64> = sqlx::query_scalar(
		"\
SELECT collection_id
FROM collections
WHERE user_id = $1 AND collection_id = ANY($2::bigint[])
ORDER BY collection_id
FOR SHARE",
	)
	.bind(user_id)
	.bind(collection_ids)
	.fetch_all(&mut *conn)
	.await?;

	Ok(rows)
}

/// Replaces every collection link of one bookmark. Callers check ownership first.
pub async fn replace_bookmark_collections(
	conn: &mut PgConnection,
	user_id: i64,
	record_id: i64,
	collection_ids: &[i64],
) -> Result<()> {
	sqlx::query("DELETE FROM record_bookmark_collections WHERE user_id = $1 AND record_id = $2")
		.bind(user_id)
		.bind(record_id)
		.execute(&mut *conn)
		.await?;
	sqlx::query(
		"\
INSERT INTO record_bookmark_collections (user_id, record_id, collection_id)
SELECT $1, $2, collection_id
FROM UNNEST($3::bigint[]) AS collection_id
ON CONFLICT DO NOTHING",
	)
	.bind(user_id)
	.bind(record_id)
	.bind(collection_ids)
	.execute(&mut *conn)
	.await?;

	Ok(())
}

pub async fn insert_collection<'e, E>(executor: E, user_id: i64, title: &str) -> Result<i64>
where
	E: Executor<'e, Database = Postgres>,
{
	let collection_id: i64 = sqlx::query_scalar(
		"\
INSERT INTO collections (user_id, title)
VALUES ($1, $2)
RETURNING collection_id",
	)
	.bind(user_id)
	.bind(title)
	.fetch_one(executor)
	.await?;

	Ok(collection_id)
}

pub async fn list_collections<'e, E>(executor: E, user_id: i64) -> Result<Vec<Collection>>
where
	E: Executor<'e, Database = Postgres>,
{
	let rows = sqlx::query_as::<_, Collection>(
		"\
SELECT collection_id, title
FROM collections
WHERE user_id = $1
ORDER BY collection_id",
	)
	.bind(user_id)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

pub async fn update_collection<'e, E>(
	executor: E,
	user_id: i64,
	collection_id: i64,
	title: &str,
) -> Result<bool>
where
	E: Executor<'e, Database = Postgres>,
{
	let result =
		sqlx::query("UPDATE collections SET title = $3 WHERE user_id = $1 AND collection_id = $2")
			.bind(user_id)
			.bind(collection_id)
			.bind(title)
			.execute(executor)
			.await?;

	Ok(result.rows_affected() > 0)
}

/// Bookmark links into the collection cascade; the bookmarks themselves stay.
pub async fn delete_collection<'e, E>(executor: E, user_id: i64, collection_id: i64) -> Result<bool>
where
	E: Executor<'e, Database = Postgres>,
{
	let result = sqlx::query("DELETE FROM collections WHERE user_id = $1 AND collection_id = $2")
		.bind(user_id)
		.bind(collection_id)
		.execute(executor)
		.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn insert_visit<'e, E>(executor: E, user_id: i64, record_id: i64) -> Result<bool>
where
	E: Executor<'e, Database = Postgres>,
{
	let result = sqlx::query(
		"\
INSERT INTO record_visits (user_id, record_id)
VALUES ($1, $2)
ON CONFLICT DO NOTHING",
	)
	.bind(user_id)
	.bind(record_id)
	.execute(executor)
	.await?;

	Ok(result.rows_affected() > 0)
}

pub struct FeedbackRow<'a> {
	pub user_id: i64,
	pub record_id: i64,
	pub orcid: &'a str,
	pub relevance: bool,
	pub presentation: bool,
	pub methodology: bool,
}

/// Returns `false` when the user already rated the record; the first rating stands.
pub async fn insert_feedback<'e, E>(executor: E, row: &FeedbackRow<'_>) -> Result<bool>
where
	E: Executor<'e, Database = Postgres>,
{
	let result = sqlx::query(
		"\
INSERT INTO feedback (user_id, record_id, orcid, relevance, presentation, methodology)
VALUES ($1, $2, $3, $4, $5, $6)
ON CONFLICT DO NOTHING",
	)
	.bind(row.user_id)
	.bind(row.record_id)
	.bind(row.orcid)
	.bind(row.relevance)
	.bind(row.presentation)
	.bind(row.methodology)
	.execute(executor)
	.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn list_feedback<'e, E>(executor: E, record_id: i64) -> Result<Vec<Feedback>>
where
	E: Executor<'e, Database = Postgres>,
{
	let rows = sqlx::query_as::<_, Feedback>(
		"\
SELECT record_id, orcid, relevance, presentation, methodology
FROM feedback
WHERE record_id = $1
ORDER BY created_at, user_id",
	)
	.bind(record_id)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}
