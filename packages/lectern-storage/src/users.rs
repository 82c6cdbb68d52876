use sqlx::{Executor, PgConnection, Postgres};
use uuid::Uuid;

use crate::{Error, Result, models::User};

pub async fn insert_user<'e, E>(executor: E, guid: Uuid, secret_hash: &str) -> Result<i64>
where
	E: Executor<'e, Database = Postgres>,
{
	let user_id: i64 = sqlx::query_scalar(
		"\
INSERT INTO users (guid, secret_hash)
VALUES ($1, $2)
RETURNING user_id",
	)
	.bind(guid)
	.bind(secret_hash)
	.fetch_one(executor)
	.await
	.map_err(|err| match err {
		sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() =>
			Error::Conflict(format!("User {guid} already exists.")),
		other => Error::Sqlx(other),
	})?;

	Ok(user_id)
}

pub async fn find_user_by_guid<'e, E>(executor: E, guid: Uuid) -> Result<Option<User>>
where
	E: Executor<'e, Database = Postgres>,
{
	let user = sqlx::query_as::<_, User>(
		"SELECT user_id, guid, secret_hash, orcid, created_at FROM users WHERE guid = $1",
	)
	.bind(guid)
	.fetch_optional(executor)
	.await?;

	Ok(user)
}

/// Holds the user row until the surrounding transaction ends.
///
/// Every transaction that writes `record_feed` or `expert_feed` takes this first, so feed
/// mutations of one user apply one at a time. `NO KEY UPDATE` leaves foreign-key checks from
/// concurrent inserts unblocked.
pub async fn lock_user(conn: &mut PgConnection, user_id: i64) -> Result<()> {
	sqlx::query("SELECT user_id FROM users WHERE user_id = $1 FOR NO KEY UPDATE")
		.bind(user_id)
		.fetch_optional(&mut *conn)
		.await?;

	Ok(())
}

/// Removes the user and every row keyed by them. Ledger entries published earlier are not
/// reachable from here and remain.
pub async fn delete_user(conn: &mut PgConnection, user_id: i64) -> Result<bool> {
	lock_user(conn, user_id).await?;

	for statement in [
		"DELETE FROM record_feed WHERE user_id = $1",
		"DELETE FROM expert_feed WHERE user_id = $1",
		"DELETE FROM record_bookmark_collections WHERE user_id = $1",
		"DELETE FROM record_bookmarks WHERE user_id = $1",
		"DELETE FROM expert_bookmarks WHERE user_id = $1",
		"DELETE FROM collections WHERE user_id = $1",
		"DELETE FROM interests WHERE user_id = $1",
		"DELETE FROM feedback WHERE user_id = $1",
		"DELETE FROM record_dislikes WHERE user_id = $1",
		"DELETE FROM record_visits WHERE user_id = $1",
	] {
		sqlx::query(statement).bind(user_id).execute(&mut *conn).await?;
	}

	let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
		.bind(user_id)
		.execute(&mut *conn)
		.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn set_orcid<'e, E>(executor: E, user_id: i64, orcid: Option<&str>) -> Result<bool>
where
	E: Executor<'e, Database = Postgres>,
{
	let result = sqlx::query("UPDATE users SET orcid = $2 WHERE user_id = $1")
		.bind(user_id)
		.bind(orcid)
		.execute(executor)
		.await?;

	Ok(result.rows_affected() > 0)
}

/// Outer `None`: unknown user. Inner `None`: no expert profile.
pub async fn read_orcid<'e, E>(executor: E, user_id: i64) -> Result<Option<Option<String>>>
where
	E: Executor<'e, Database = Postgres>,
{
	let orcid: Option<Option<String>> =
		sqlx::query_scalar("SELECT orcid FROM users WHERE user_id = $1")
			.bind(user_id)
			.fetch_optional(executor)
			.await?;

	Ok(orcid)
}
